use composer::{Selection, find_language, find_personality};
use llm::{ChatClient, Conversation, Message, PoemView, RelayError, relay};
use playback::{AudioSink, PlaybackController};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use tts::Tts;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Unknown personality: {0}")]
    UnknownPersonality(String),
}

/// Build a [`Selection`] from catalog names. Blank names count as unset.
pub fn resolve_selection(
    language: Option<&str>,
    personality: Option<&str>,
) -> Result<Selection, SessionError> {
    let mut selection = Selection::new();
    if let Some(name) = language.filter(|n| !n.trim().is_empty()) {
        let found =
            find_language(name).ok_or_else(|| SessionError::UnknownLanguage(name.to_string()))?;
        selection.select_language(found);
    }
    if let Some(name) = personality.filter(|n| !n.trim().is_empty()) {
        let found = find_personality(name)
            .ok_or_else(|| SessionError::UnknownPersonality(name.to_string()))?;
        selection.select_personality(found);
    }
    Ok(selection)
}

/// Everything one page visit owns: picks, poems and the player.
pub struct Session {
    selection: Selection,
    conversation: Mutex<Conversation>,
    chat: Arc<dyn ChatClient>,
    player: PlaybackController,
}

impl Session {
    pub fn new(chat: Arc<dyn ChatClient>, speech: Arc<dyn Tts>, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            selection: Selection::new(),
            conversation: Mutex::new(Conversation::new()),
            chat,
            player: PlaybackController::new(speech, sink),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_language(&mut self, name: &str) -> Result<(), SessionError> {
        let language =
            find_language(name).ok_or_else(|| SessionError::UnknownLanguage(name.to_string()))?;
        self.selection.select_language(language);
        Ok(())
    }

    pub fn select_personality(&mut self, name: &str) -> Result<(), SessionError> {
        let personality = find_personality(name)
            .ok_or_else(|| SessionError::UnknownPersonality(name.to_string()))?;
        self.selection.select_personality(personality);
        Ok(())
    }

    pub fn prompt(&self) -> String {
        self.selection.prompt()
    }

    /// Ask for a poem with the current selection and hand the finished text
    /// to the player. A broken stream leaves the partial poem in the
    /// conversation but does not replace what the player holds.
    pub async fn generate<F>(&self, on_update: F) -> Result<Message, RelayError>
    where
        F: FnMut(&Message),
    {
        let prompt = self.prompt();
        info!(prompt = %prompt, "generating poem");
        let poem = relay(self.chat.as_ref(), &self.conversation, prompt, on_update).await?;
        self.player.set_text(poem.content.clone()).await;
        Ok(poem)
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    /// Run `f` against the current poem display.
    pub async fn with_view<R>(&self, f: impl FnOnce(PoemView<'_>) -> R) -> R {
        let conv = self.conversation.lock().await;
        f(conv.view())
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.conversation.lock().await.all().to_vec()
    }
}
