use serde::Serialize;

/// Playhead position and total length, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Progress {
    pub position: f64,
    pub duration: f64,
}

impl Progress {
    /// `m:ss / m:ss` as shown under the player.
    pub fn label(&self) -> String {
        format!("{} / {}", format_time(self.position), format_time(self.duration))
    }
}

/// Format seconds as `m:ss`. Non-finite or negative input shows `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".into();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
