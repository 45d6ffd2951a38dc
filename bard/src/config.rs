use clap::Parser;
use llm::{DEFAULT_BASE_URL, OpenAiConfig};
use tts::OpenAiTtsConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to bind the HTTP server
    #[arg(long, env = "BARD_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Credential for the chat endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Credential for the speech endpoint (defaults to the chat key)
    #[arg(long, env = "OPENAI_TTS_API_KEY", hide_env_values = true)]
    pub tts_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_url: String,

    #[arg(long, default_value = "gpt-4o-mini")]
    pub chat_model: String,

    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    #[arg(long, default_value_t = 1000)]
    pub max_tokens: u32,

    #[arg(long, default_value = "tts-1")]
    pub tts_model: String,

    #[arg(long, default_value_t = 0.9)]
    pub speech_speed: f32,
}

impl Cli {
    pub fn chat_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            base_url: self.openai_url.clone(),
            api_key: self.openai_api_key.clone(),
            model: self.chat_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn tts_config(&self) -> OpenAiTtsConfig {
        OpenAiTtsConfig {
            base_url: self.openai_url.clone(),
            api_key: self
                .tts_api_key
                .clone()
                .or_else(|| self.openai_api_key.clone()),
            model: self.tts_model.clone(),
            speed: self.speech_speed,
        }
    }
}
