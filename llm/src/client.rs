//! HTTP client for the OpenAI chat-completions endpoint.
//!
//! [`OpenAiClient`] implements [`ChatClient`] by posting the conversation with
//! `stream: true` and decoding the server-sent events into text deltas.

use crate::error::LLMError;
use crate::traits::{ChatClient, ChatMessage, ChatStream};
use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for [`OpenAiClient`].
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl OpenAiConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_CHAT_MODEL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.api_key = std::env::var("OPENAI_API_KEY").ok();
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            cfg.base_url = url;
        }
        if let Ok(model) = std::env::var("OPENAI_CHAT_MODEL") {
            cfg.model = model;
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
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    /// Set when the provider fails after the stream has started.
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Deserialize)]
struct ChunkError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// One decoded line of the event stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseLine {
    Delta(String),
    Done,
    Skip,
}

/// Decode a single `data:` line. Blank lines, comments and other fields are skipped.
pub(crate) fn parse_sse_line(line: &str) -> Result<SseLine, LLMError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }
    let chunk: CompletionChunk =
        serde_json::from_str(data).map_err(|e| LLMError::InvalidResponse(e.to_string()))?;
    if let Some(err) = chunk.error {
        let message = if err.message.is_empty() {
            "provider reported an error mid-stream".to_string()
        } else {
            err.message
        };
        return Err(LLMError::InvalidResponse(message));
    }
    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default();
    if text.is_empty() {
        Ok(SseLine::Skip)
    } else {
        Ok(SseLine::Delta(text))
    }
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(OpenAiConfig::from_env())
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    fn has_credential(&self) -> bool {
        self.api_key().is_some()
    }

    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<ChatStream, LLMError> {
        let key = self
            .api_key()
            .ok_or(LLMError::MissingCredential("OPENAI_API_KEY"))?;
        if messages.is_empty() {
            return Err(LLMError::InvalidInput("messages must not be empty".into()));
        }
        info!(messages = messages.len(), model = %self.config.model, "requesting chat completion");
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
                stream: true,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "chat provider returned an error");
            return Err(LLMError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(decode_events(resp.bytes_stream()))
    }
}

/// Turn a raw event-stream body into text deltas.
///
/// Bytes are buffered until a full line is available, so events and UTF-8
/// sequences may be split across chunks. The stream ends after `[DONE]` or
/// the first error.
pub(crate) fn decode_events<S, B, E>(body: S) -> ChatStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<LLMError> + Send,
{
    let mut body = Box::pin(body);
    let stream = async_stream::stream! {
        let mut buf: Vec<u8> = Vec::new();
        let mut done = false;
        while !done {
            let Some(chunk) = body.next().await else { break };
            match chunk {
                Ok(bytes) => buf.extend_from_slice(bytes.as_ref()),
                Err(e) => {
                    yield Err(e.into());
                    done = true;
                    break;
                }
            }
            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw);
                match parse_sse_line(&line) {
                    Ok(SseLine::Delta(text)) => yield Ok(text),
                    Ok(SseLine::Skip) => {}
                    Ok(SseLine::Done) => {
                        done = true;
                        break;
                    }
                    Err(e) => {
                        yield Err(e);
                        done = true;
                        break;
                    }
                }
            }
        }
        if !done && !buf.is_empty() {
            let line = String::from_utf8_lossy(&buf).into_owned();
            match parse_sse_line(&line) {
                Ok(SseLine::Delta(text)) => yield Ok(text),
                Ok(_) => {}
                Err(e) => yield Err(e),
            }
        }
        debug!("chat stream finished");
    };
    Box::pin(stream)
}
