use crate::conversation::{Conversation, Message, MessageId, Role};
use crate::error::LLMError;
use crate::traits::ChatClient;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Failure of a [`relay`] exchange.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The exchange never started. No assistant message was appended.
    #[error("chat request failed: {0}")]
    Start(#[source] LLMError),
    /// The stream broke after the assistant message was appended.
    /// `message` holds whatever arrived before the failure.
    #[error("chat stream interrupted: {source}")]
    Stream {
        message: Message,
        #[source]
        source: LLMError,
    },
}

impl RelayError {
    pub fn llm_error(&self) -> &LLMError {
        match self {
            Self::Start(e) => e,
            Self::Stream { source, .. } => source,
        }
    }
}

fn snapshot(conv: &Conversation, id: MessageId) -> Message {
    conv.get(id).cloned().unwrap_or(Message {
        id,
        role: Role::Assistant,
        content: String::new(),
    })
}

/// Send `prompt` as a new user message and stream the reply into `conversation`.
///
/// Exactly one assistant message is appended once the provider accepts the
/// request; it is filled in place as chunks arrive and `on_update` sees it
/// after every chunk. The lock is not held while waiting on the network.
pub async fn relay<C, F>(
    client: &C,
    conversation: &Mutex<Conversation>,
    prompt: impl Into<String>,
    mut on_update: F,
) -> Result<Message, RelayError>
where
    C: ChatClient + ?Sized,
    F: FnMut(&Message),
{
    let history = {
        let mut conv = conversation.lock().await;
        conv.push_user(prompt);
        conv.to_chat()
    };
    debug!(messages = history.len(), "relaying conversation");

    let mut stream = client
        .stream_chat(&history)
        .await
        .map_err(RelayError::Start)?;

    let id = conversation.lock().await.begin_assistant();
    while let Some(chunk) = stream.next().await {
        let mut conv = conversation.lock().await;
        match chunk {
            Ok(text) => {
                if let Some(msg) = conv.append_chunk(id, &text) {
                    on_update(msg);
                }
            }
            Err(source) => {
                warn!(%id, error = %source, "chat stream interrupted");
                let message = snapshot(&conv, id);
                return Err(RelayError::Stream { message, source });
            }
        }
    }

    let message = snapshot(&*conversation.lock().await, id);
    debug!(%id, chars = message.content.len(), "chat reply complete");
    Ok(message)
}
