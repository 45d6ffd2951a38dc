use crate::catalog::{Language, Personality};
use serde::Serialize;
use tracing::debug;

/// Instruction used when nothing has been selected.
pub const DEFAULT_PROMPT: &str = "Write a beautiful short poem about coding and AI";

/// The user's current picks. Either, both, or neither may be set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub language: Option<Language>,
    pub personality: Option<Personality>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    /// Replace the selected language.
    pub fn select_language(&mut self, language: Language) {
        self.language = Some(language);
    }

    /// Replace the selected personality.
    pub fn select_personality(&mut self, personality: Personality) {
        self.personality = Some(personality);
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.personality.is_none()
    }

    /// Build the instruction for this selection.
    pub fn prompt(&self) -> String {
        compose_prompt(self)
    }
}

/// Turn a [`Selection`] into the natural-language instruction sent to the model.
pub fn compose_prompt(selection: &Selection) -> String {
    let prompt = match (&selection.language, &selection.personality) {
        (Some(lang), Some(p)) => format!(
            "Write a beautiful poem from the perspective of an AI with a \"{}\" personality, \
             reflecting on {} programming. Incorporate concepts like {} and embody traits that \
             are {}. The poem should feel {}.",
            p.name,
            lang.name,
            lang.concepts.join(", "),
            p.traits.join(", "),
            p.description.to_lowercase()
        ),
        (Some(lang), None) => format!(
            "Write a beautiful poem about {} programming and AI, incorporating concepts like {}.",
            lang.name,
            lang.concepts.join(", ")
        ),
        (None, Some(p)) => format!(
            "Write a beautiful poem from the perspective of an AI with a \"{}\" personality \
             about coding. The AI should be {} and embody the essence of \"{}\".",
            p.name,
            p.traits.join(", "),
            p.description
        ),
        (None, None) => DEFAULT_PROMPT.to_string(),
    };
    debug!(
        language = selection.language.as_ref().map(|l| l.name.as_str()),
        personality = selection.personality.as_ref().map(|p| p.name.as_str()),
        "composed prompt"
    );
    prompt
}
