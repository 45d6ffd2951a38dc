use serde::Serialize;
use thiserror::Error;

/// Coarse category of a relay failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A credential is missing. Never reaches the network.
    Configuration,
    /// A required field is missing or invalid. Never reaches the network.
    ClientInput,
    /// The provider answered with a failure or could not be reached.
    Upstream,
}

/// Finer classification of upstream failures, used to choose user-facing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamKind {
    RateLimit,
    Auth,
    Network,
    Generic,
}

impl UpstreamKind {
    /// Classify a provider failure from its HTTP status (if any) and message.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        match status {
            Some(429) => return Self::RateLimit,
            Some(401) | Some(403) => return Self::Auth,
            _ => {}
        }
        let msg = message.to_lowercase();
        if msg.contains("rate limit") || msg.contains("rate_limit") || msg.contains("quota") {
            Self::RateLimit
        } else if msg.contains("api key")
            || msg.contains("api_key")
            || msg.contains("unauthorized")
            || msg.contains("authentication")
        {
            Self::Auth
        } else if msg.contains("network")
            || msg.contains("connect")
            || msg.contains("timed out")
            || msg.contains("dns")
        {
            Self::Network
        } else {
            Self::Generic
        }
    }

    /// Stable label for JSON payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::Auth => "auth",
            Self::Network => "network",
            Self::Generic => "generic",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimit => "The service is busy right now. Please wait a moment and try again.",
            Self::Auth => "The service rejected our credentials. Please check the API key.",
            Self::Network => "Could not reach the service. Please check your connection.",
            Self::Generic => "Something went wrong. Please try again.",
        }
    }
}

/// Errors produced by a [`ChatClient`](crate::ChatClient).
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upstream error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LLMError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential(_) => ErrorKind::Configuration,
            Self::InvalidInput(_) => ErrorKind::ClientInput,
            Self::Upstream { .. } | Self::Network(_) | Self::InvalidResponse(_) => {
                ErrorKind::Upstream
            }
        }
    }

    /// Upstream classification, `None` for configuration and input errors.
    pub fn upstream_kind(&self) -> Option<UpstreamKind> {
        match self {
            Self::Upstream { status, body } => Some(UpstreamKind::classify(Some(*status), body)),
            Self::Network(_) => Some(UpstreamKind::Network),
            Self::InvalidResponse(msg) => Some(UpstreamKind::classify(None, msg)),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wins_over_message() {
        assert_eq!(UpstreamKind::classify(Some(429), "boom"), UpstreamKind::RateLimit);
        assert_eq!(UpstreamKind::classify(Some(401), "rate limit"), UpstreamKind::Auth);
    }

    #[test]
    fn message_fallbacks() {
        assert_eq!(
            UpstreamKind::classify(Some(500), "Incorrect API key provided"),
            UpstreamKind::Auth
        );
        assert_eq!(
            UpstreamKind::classify(None, "You exceeded your current quota"),
            UpstreamKind::RateLimit
        );
        assert_eq!(
            UpstreamKind::classify(None, "error trying to connect"),
            UpstreamKind::Network
        );
        assert_eq!(UpstreamKind::classify(Some(500), "oops"), UpstreamKind::Generic);
    }

    #[test]
    fn kinds() {
        assert_eq!(LLMError::MissingCredential("OPENAI_API_KEY").kind(), ErrorKind::Configuration);
        assert_eq!(LLMError::InvalidInput("x".into()).kind(), ErrorKind::ClientInput);
        assert!(LLMError::MissingCredential("k").upstream_kind().is_none());
        let err = LLMError::Upstream { status: 429, body: String::new() };
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.upstream_kind(), Some(UpstreamKind::RateLimit));
    }
}
