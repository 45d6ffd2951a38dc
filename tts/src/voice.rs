use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaking styles offered by the speech model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Voice::Alloy => "Neutral and clear",
            Voice::Echo => "Warm and expressive",
            Voice::Fable => "Storytelling voice",
            Voice::Onyx => "Deep and resonant",
            Voice::Nova => "Bright and energetic",
            Voice::Shimmer => "Soft and gentle",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn parse(value: &str) -> Option<Voice> {
        Voice::ALL.into_iter().find(|v| v.as_str() == value)
    }

    /// Lookup that falls back to the default voice instead of failing.
    pub fn parse_or_default(value: Option<&str>) -> Voice {
        match value {
            Some(v) => Voice::parse(v).unwrap_or_else(|| {
                tracing::debug!(voice = v, "unknown voice, using default");
                Voice::default()
            }),
            None => Voice::default(),
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
