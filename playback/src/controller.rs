use crate::progress::Progress;
use crate::sink::{AudioClip, AudioSink, PlaybackError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tts::{TTSError, Tts, Voice};

/// Resting states of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Synthesizing,
    Paused,
    Playing,
}

/// What a play request ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    Paused,
    /// Already synthesizing or playing.
    Ignored,
    /// Autoplay was refused; the next user interaction retries once.
    Deferred,
    /// The sink aborted playback; the clip stays loaded.
    Interrupted,
    /// Voice or text changed while this request was in flight.
    Superseded,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Speech(#[from] TTSError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("no poem text to play")]
    NothingToPlay,
    #[error("no audio loaded")]
    NotLoaded,
}

#[derive(Default)]
struct Inner {
    state: PlaybackState,
    text: Option<String>,
    voice: Voice,
    clip: Option<Arc<AudioClip>>,
    /// Bumped whenever the clip is invalidated; in-flight work compares against it.
    generation: u64,
    clips_loaded: u64,
    retry_armed: bool,
}

/// Owns the single playable clip of one session.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<Mutex<Inner>>,
    tts: Arc<dyn Tts>,
    sink: Arc<dyn AudioSink>,
}

impl PlaybackController {
    pub fn new(tts: Arc<dyn Tts>, sink: Arc<dyn AudioSink>) -> Self {
        Self::with_voice(tts, sink, Voice::default())
    }

    pub fn with_voice(tts: Arc<dyn Tts>, sink: Arc<dyn AudioSink>, voice: Voice) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                voice,
                ..Inner::default()
            })),
            tts,
            sink,
        }
    }

    pub async fn state(&self) -> PlaybackState {
        self.inner.lock().await.state
    }

    pub async fn voice(&self) -> Voice {
        self.inner.lock().await.voice
    }

    pub async fn clip(&self) -> Option<Arc<AudioClip>> {
        self.inner.lock().await.clip.clone()
    }

    pub async fn retry_armed(&self) -> bool {
        self.inner.lock().await.retry_armed
    }

    pub async fn progress(&self) -> Progress {
        let inner = self.inner.lock().await;
        if inner.clip.is_none() {
            return Progress::default();
        }
        Progress {
            position: self.sink.current_time(),
            duration: self.sink.duration(),
        }
    }

    fn release(&self, inner: &mut Inner) {
        inner.generation += 1;
        inner.retry_armed = false;
        inner.state = PlaybackState::Idle;
        if let Some(clip) = inner.clip.take() {
            self.sink.pause();
            self.sink.unload();
            debug!(clip = clip.id, "released clip");
        }
    }

    /// Replace the poem to speak. A different text invalidates the current clip.
    pub async fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let mut inner = self.inner.lock().await;
        if inner.text.as_deref() == Some(text.as_str()) {
            return;
        }
        self.release(&mut inner);
        inner.text = Some(text);
    }

    /// Switch voice. A different voice releases the current clip and returns to Idle.
    pub async fn select_voice(&self, voice: Voice) {
        let mut inner = self.inner.lock().await;
        if inner.voice == voice {
            return;
        }
        info!(from = %inner.voice, to = %voice, "voice changed");
        self.release(&mut inner);
        inner.voice = voice;
    }

    pub async fn play(&self) -> Result<PlayOutcome, ControllerError> {
        let mut inner = self.inner.lock().await;
        let state = inner.state;
        match state {
            PlaybackState::Synthesizing | PlaybackState::Playing => {
                debug!(?state, "play ignored");
                Ok(PlayOutcome::Ignored)
            }
            PlaybackState::Paused => {
                let generation = inner.generation;
                drop(inner);
                self.start(generation).await
            }
            PlaybackState::Idle => {
                let text = match inner.text.as_deref() {
                    Some(t) if !t.trim().is_empty() => t.to_string(),
                    _ => return Err(ControllerError::NothingToPlay),
                };
                let voice = inner.voice;
                let generation = inner.generation;
                inner.state = PlaybackState::Synthesizing;
                drop(inner);

                let result = self.tts.synthesize(&text, voice).await;

                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    debug!("discarding stale synthesis");
                    return Ok(PlayOutcome::Superseded);
                }
                let audio = match result {
                    Ok(audio) => audio,
                    Err(e) => {
                        warn!(error = %e, "speech synthesis failed");
                        inner.state = PlaybackState::Idle;
                        return Err(e.into());
                    }
                };
                inner.clips_loaded += 1;
                let clip = Arc::new(AudioClip::new(inner.clips_loaded, text, voice, audio));
                info!(clip = clip.id, bytes = clip.audio.len(), %voice, "clip loaded");
                self.sink.load(clip.clone());
                inner.clip = Some(clip);
                inner.state = PlaybackState::Paused;
                drop(inner);
                self.start(generation).await
            }
        }
    }

    async fn start(&self, generation: u64) -> Result<PlayOutcome, ControllerError> {
        let result = self.sink.play().await;
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            return Ok(PlayOutcome::Superseded);
        }
        match result {
            Ok(()) => {
                inner.state = PlaybackState::Playing;
                inner.retry_armed = false;
                Ok(PlayOutcome::Started)
            }
            Err(PlaybackError::NotAllowed(reason)) => {
                warn!(%reason, "autoplay blocked, waiting for user interaction");
                inner.state = PlaybackState::Paused;
                inner.retry_armed = true;
                Ok(PlayOutcome::Deferred)
            }
            Err(PlaybackError::Aborted) => {
                inner.state = PlaybackState::Paused;
                Ok(PlayOutcome::Interrupted)
            }
            Err(e) => {
                warn!(error = %e, "playback failed");
                self.release(&mut inner);
                Err(e.into())
            }
        }
    }

    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        inner.retry_armed = false;
        if inner.state == PlaybackState::Playing {
            self.sink.pause();
            inner.state = PlaybackState::Paused;
        }
    }

    /// Play when not playing, pause when playing.
    pub async fn toggle(&self) -> Result<PlayOutcome, ControllerError> {
        if self.state().await == PlaybackState::Playing {
            self.pause().await;
            return Ok(PlayOutcome::Paused);
        }
        self.play().await
    }

    /// Pause and rewind. Does nothing when no clip is loaded.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if inner.clip.is_none() {
            return;
        }
        inner.retry_armed = false;
        self.sink.pause();
        self.sink.seek(0.0);
        inner.state = PlaybackState::Paused;
    }

    /// Rewind the loaded clip without synthesizing again.
    pub async fn restart(&self) -> Result<(), ControllerError> {
        let inner = self.inner.lock().await;
        if inner.clip.is_none() {
            return Err(ControllerError::NotLoaded);
        }
        self.sink.seek(0.0);
        Ok(())
    }

    /// The sink reached the end of the clip.
    pub async fn on_ended(&self) {
        let mut inner = self.inner.lock().await;
        if inner.clip.is_some() {
            self.sink.seek(0.0);
            inner.state = PlaybackState::Paused;
        }
    }

    /// The sink reported a failure outside of `play`.
    pub async fn on_error(&self, error: PlaybackError) {
        warn!(%error, "audio element error");
        let mut inner = self.inner.lock().await;
        self.release(&mut inner);
    }

    /// Consume an armed autoplay retry, if any.
    pub async fn on_user_interaction(&self) -> Result<PlayOutcome, ControllerError> {
        let mut inner = self.inner.lock().await;
        if !inner.retry_armed || inner.clip.is_none() {
            return Ok(PlayOutcome::Ignored);
        }
        inner.retry_armed = false;
        let generation = inner.generation;
        drop(inner);
        debug!("retrying deferred playback");
        self.start(generation).await
    }
}
