//! Streaming chat relay for poem generation.
//!
//! The `llm` crate defines the [`ChatClient`] trait along with the
//! [`OpenAiClient`] implementation, the append-only [`Conversation`] a
//! session keeps, and [`relay`] which streams an assistant reply into it.
//! Errors from every relay share the [`ErrorKind`] / [`UpstreamKind`]
//! taxonomy so callers can pick user-facing text per category.

pub mod client;
pub mod conversation;
pub mod error;
pub mod runner;
pub mod traits;

pub use client::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL};
pub use conversation::{Conversation, Message, MessageId, PoemView, Role};
pub use error::{ErrorKind, LLMError, UpstreamKind};
pub use runner::{relay, RelayError};
pub use traits::{ChatClient, ChatMessage, ChatStream};
