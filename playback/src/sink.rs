use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tts::{SpeechAudio, Voice};

/// A synthesized poem loaded (or about to be loaded) into a sink.
///
/// The controller owns the only long-lived reference; a sink may hold one
/// while the clip is loaded and must drop it on [`AudioSink::unload`].
#[derive(Debug)]
pub struct AudioClip {
    /// Ordinal within the owning controller.
    pub id: u64,
    pub text: String,
    pub voice: Voice,
    pub audio: SpeechAudio,
}

impl AudioClip {
    pub fn new(id: u64, text: impl Into<String>, voice: Voice, audio: SpeechAudio) -> Self {
        Self {
            id,
            text: text.into(),
            voice,
            audio,
        }
    }
}

/// Failures reported by the sink when starting playback.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Autoplay policy refused playback until the user interacts.
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
    /// Playback was interrupted by a newer load or pause.
    #[error("playback aborted")]
    Aborted,
    #[error("playback failed: {0}")]
    Failed(String),
}

/// Capability surface of an audio element.
#[async_trait]
pub trait AudioSink: Send + Sync {
    fn load(&self, clip: Arc<AudioClip>);
    /// Detach and drop the loaded clip, if any.
    fn unload(&self);
    async fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn seek(&self, position: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
}

#[derive(Default)]
struct HeadlessState {
    clip: Option<Arc<AudioClip>>,
    position: f64,
    playing: bool,
}

/// Sink that renders nothing and keeps time by hand.
///
/// Duration is estimated from the payload size at 128 kbit/s.
#[derive(Clone, Default)]
pub struct HeadlessSink {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn loaded(&self) -> Option<Arc<AudioClip>> {
        self.state.lock().unwrap().clip.clone()
    }

    /// Move the playhead forward by `secs`. Returns `true` when this reaches the end.
    pub fn advance(&self, secs: f64) -> bool {
        let duration = self.duration();
        let mut state = self.state.lock().unwrap();
        if !state.playing {
            return false;
        }
        state.position = (state.position + secs).min(duration);
        if state.position >= duration {
            state.playing = false;
            return true;
        }
        false
    }
}

fn estimated_duration(clip: &AudioClip) -> f64 {
    clip.audio.len() as f64 * 8.0 / 128_000.0
}

#[async_trait]
impl AudioSink for HeadlessSink {
    fn load(&self, clip: Arc<AudioClip>) {
        let mut state = self.state.lock().unwrap();
        state.clip = Some(clip);
        state.position = 0.0;
        state.playing = false;
    }

    fn unload(&self) {
        let mut state = self.state.lock().unwrap();
        state.clip = None;
        state.position = 0.0;
        state.playing = false;
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        if state.clip.is_none() {
            return Err(PlaybackError::Failed("no source".into()));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&self) {
        self.state.lock().unwrap().playing = false;
    }

    fn seek(&self, position: f64) {
        self.state.lock().unwrap().position = position.max(0.0);
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> f64 {
        self.state
            .lock()
            .unwrap()
            .clip
            .as_deref()
            .map(estimated_duration)
            .unwrap_or(0.0)
    }
}
