//! Web front end for the poem generator.
//!
//! Serves the page, the catalog and prompt endpoints, and relays chat and
//! speech requests to OpenAI. A [`Session`] bundles the per-user state the
//! page keeps: selection, conversation and playback.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod web;

pub use config::Cli;
pub use error::ApiError;
pub use logging::init_logging;
pub use session::{Session, SessionError};
pub use web::{AppState, app};
