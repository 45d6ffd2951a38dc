//! Audio playback for synthesized poems.
//!
//! [`PlaybackController`] drives one [`AudioSink`] through an explicit state
//! machine: it requests speech from a [`tts::Tts`], loads the resulting
//! [`AudioClip`] and exposes play, pause, stop and restart. The sink stands
//! in for whatever actually renders audio (a browser element, a device, a
//! test double); its events are fed back through the controller's `on_*`
//! methods.

pub mod controller;
pub mod progress;
pub mod sink;

pub use controller::{ControllerError, PlayOutcome, PlaybackController, PlaybackState};
pub use progress::{format_time, Progress};
pub use sink::{AudioClip, AudioSink, HeadlessSink, PlaybackError};
