use crate::{Result, SpeechAudio, TTSError, Tts, Voice};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

/// Settings for [`OpenAiTts`].
#[derive(Clone, Debug)]
pub struct OpenAiTtsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub speed: f32,
}

impl Default for OpenAiTtsConfig {
    fn default() -> Self {
        Self {
            base_url: llm::DEFAULT_BASE_URL.into(),
            api_key: None,
            model: "tts-1".into(),
            speed: 0.9,
        }
    }
}

impl OpenAiTtsConfig {
    /// Read `OPENAI_TTS_API_KEY` (falling back to `OPENAI_API_KEY`) and `OPENAI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.api_key = std::env::var("OPENAI_TTS_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok();
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            cfg.base_url = url;
        }
        cfg
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: Voice,
    speed: f32,
    response_format: &'static str,
}

/// Client for the OpenAI `audio/speech` endpoint.
#[derive(Clone)]
pub struct OpenAiTts {
    config: OpenAiTtsConfig,
    client: Client,
}

impl OpenAiTts {
    pub fn new(config: OpenAiTtsConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(OpenAiTtsConfig::from_env())
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}

#[async_trait]
impl Tts for OpenAiTts {
    fn has_credential(&self) -> bool {
        self.api_key().is_some()
    }

    async fn synthesize(&self, text: &str, voice: Voice) -> Result<SpeechAudio> {
        let key = self
            .api_key()
            .ok_or(TTSError::MissingCredential("OPENAI_API_KEY"))?;
        if text.trim().is_empty() {
            return Err(TTSError::MissingText);
        }
        info!(chars = text.len(), %voice, "requesting speech");
        let url = format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(&SpeechRequest {
                model: &self.config.model,
                input: text,
                voice,
                speed: self.config.speed,
                response_format: "mp3",
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "speech provider returned an error");
            return Err(TTSError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        info!(bytes = bytes.len(), "speech generated");
        Ok(SpeechAudio::mpeg(bytes.to_vec()))
    }
}
