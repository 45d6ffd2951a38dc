use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::ChatMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Ordinal identity of a message within its conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

/// Append-only message history for one session.
///
/// Messages are never removed. The only mutation of an existing message is
/// [`Conversation::append_chunk`], which fills an assistant reply in place
/// while it streams.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

/// What the page shows: the newest poem up top, earlier ones below.
#[derive(Debug, PartialEq, Eq)]
pub struct PoemView<'a> {
    pub latest: Option<&'a Message>,
    pub collection: Vec<&'a Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, role: Role, content: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message { id, role, content });
        id
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Role::User, content.into())
    }

    /// Append an empty assistant message to be filled by streamed chunks.
    pub fn begin_assistant(&mut self) -> MessageId {
        self.push(Role::Assistant, String::new())
    }

    /// Append `chunk` to the assistant message `id`.
    ///
    /// Returns `None` if `id` does not name an assistant message.
    pub fn append_chunk(&mut self, id: MessageId, chunk: &str) -> Option<&Message> {
        let msg = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.id == id && m.role == Role::Assistant)?;
        msg.content.push_str(chunk);
        Some(msg)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// History in the shape the provider expects.
    pub fn to_chat(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|m| ChatMessage::new(m.role, m.content.clone()))
            .collect()
    }

    /// The most recent assistant message.
    pub fn latest_poem(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn view(&self) -> PoemView<'_> {
        let latest = self.latest_poem();
        let collection = self
            .messages
            .iter()
            .filter(|m| m.role == Role::Assistant && Some(m.id) != latest.map(|l| l.id))
            .collect();
        PoemView { latest, collection }
    }
}
