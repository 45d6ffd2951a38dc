use async_trait::async_trait;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::conversation::Role;
use crate::error::LLMError;

/// Incremental assistant text, in the order the provider produced it.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

/// A `{role, content}` pair as sent to the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Whether a provider credential is available.
    fn has_credential(&self) -> bool;

    /// Start a streamed completion for `messages`.
    ///
    /// Implementations must return [`LLMError::MissingCredential`] without
    /// touching the network when no credential is configured.
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<ChatStream, LLMError>;
}
