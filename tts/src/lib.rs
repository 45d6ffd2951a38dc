//! Convert poem text into audio using a hosted speech model.

use async_trait::async_trait;
use llm::{ErrorKind, UpstreamKind};
use thiserror::Error;

pub mod openai;
pub mod voice;

pub use openai::{OpenAiTts, OpenAiTtsConfig};
pub use voice::Voice;

/// Content type of every payload produced by this crate.
pub const AUDIO_MPEG: &str = "audio/mpeg";

#[derive(Debug, Error)]
pub enum TTSError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),
    #[error("Text is required")]
    MissingText,
    #[error("upstream error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
}

impl TTSError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential(_) => ErrorKind::Configuration,
            Self::MissingText => ErrorKind::ClientInput,
            Self::Upstream { .. } | Self::Network(_) => ErrorKind::Upstream,
        }
    }

    pub fn upstream_kind(&self) -> Option<UpstreamKind> {
        match self {
            Self::Upstream { status, body } => Some(UpstreamKind::classify(Some(*status), body)),
            Self::Network(_) => Some(UpstreamKind::Network),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TTSError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, TTSError>;

/// A complete, buffered audio payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl SpeechAudio {
    pub fn mpeg(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: AUDIO_MPEG,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Text-to-speech engine interface.
#[async_trait]
pub trait Tts: Send + Sync {
    /// Whether a provider credential is available.
    fn has_credential(&self) -> bool;

    /// Synthesize `text` spoken by `voice` into one complete payload.
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<SpeechAudio>;
}
