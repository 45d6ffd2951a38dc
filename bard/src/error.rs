use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm::{ErrorKind, LLMError, UpstreamKind};
use serde::Serialize;
use tracing::error;
use tts::TTSError;

const MISSING_KEY: &str = "OpenAI API key not configured";

pub const CHAT_KEY: &str = "OPENAI_API_KEY";
pub const SPEECH_KEY: &str = "OPENAI_TTS_API_KEY or OPENAI_API_KEY";

fn credential_name(e: &LLMError) -> &'static str {
    match e {
        LLMError::MissingCredential(name) => *name,
        _ => CHAT_KEY,
    }
}

/// JSON error returned by every `/api` route.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
    pub category: Option<UpstreamKind>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    /// Text the page can show for `category`.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    timestamp: String,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: None,
            category: None,
        }
    }

    /// `variable` names the setting that was missing.
    pub fn missing_credential(variable: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: MISSING_KEY.into(),
            details: Some(format!("{variable} is not set")),
            category: None,
        }
    }

    fn upstream(error: &str, details: String, category: Option<UpstreamKind>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Some(details),
            category,
        }
    }
}

impl From<LLMError> for ApiError {
    fn from(e: LLMError) -> Self {
        match e.kind() {
            ErrorKind::Configuration => Self::missing_credential(credential_name(&e)),
            ErrorKind::ClientInput => Self::bad_request(e.to_string()),
            ErrorKind::Upstream => {
                error!(error = %e, "chat relay failed");
                Self::upstream("Internal Server Error", e.to_string(), e.upstream_kind())
            }
        }
    }
}

impl From<TTSError> for ApiError {
    fn from(e: TTSError) -> Self {
        match e.kind() {
            ErrorKind::Configuration => match e {
                TTSError::MissingCredential(name) => Self::missing_credential(name),
                _ => Self::missing_credential(SPEECH_KEY),
            },
            ErrorKind::ClientInput => Self::bad_request(e.to_string()),
            ErrorKind::Upstream => {
                error!(error = %e, "speech relay failed");
                Self::upstream(
                    "Text-to-speech generation failed",
                    e.to_string(),
                    e.upstream_kind(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            details: self.details,
            category: self.category.map(|c| c.as_str()),
            message: self.category.map(|c| c.user_message()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (self.status, Json(body)).into_response()
    }
}
