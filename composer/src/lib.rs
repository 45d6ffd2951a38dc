//! Prompt composition for poem requests.
//!
//! A [`Selection`] holds at most one [`Language`] and at most one
//! [`Personality`] picked from the built-in [`catalog`]. Calling
//! [`Selection::prompt`] (or [`compose_prompt`]) turns it into the
//! instruction sent to the chat model.

pub mod catalog;
pub mod prompt;

pub use catalog::{find_language, find_personality, languages, personalities, Language, Personality};
pub use prompt::{compose_prompt, Selection, DEFAULT_PROMPT};
