//! Timer sound choices.
//!
//! The sound is not played in-process: it travels with the scheduled
//! notification and the OS plays it on delivery, so a suspended app still
//! rings. This module maps the user's choice to what each notification
//! backend understands.

mod error;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::SoundError;

/// Sound played when a step timer finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSound {
    /// Platform default notification sound
    #[default]
    Default,
    /// Soft chime
    Chime,
    /// Kitchen bell
    Bell,
    /// Silent notification
    None,
}

impl TimerSound {
    /// Every selectable sound, in menu order.
    pub const ALL: [TimerSound; 4] = [
        TimerSound::Default,
        TimerSound::Chime,
        TimerSound::Bell,
        TimerSound::None,
    ];

    /// Returns the string representation of the sound.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerSound::Default => "default",
            TimerSound::Chime => "chime",
            TimerSound::Bell => "bell",
            TimerSound::None => "none",
        }
    }

    /// Returns true if the notification should be silent.
    pub fn is_silent(&self) -> bool {
        matches!(self, TimerSound::None)
    }

    /// Bundled sound file handed to the notification center.
    ///
    /// `None` means "use the platform default" for [`TimerSound::Default`]
    /// and "no sound" for [`TimerSound::None`].
    pub fn bundled_file(&self) -> Option<&'static str> {
        match self {
            TimerSound::Chime => Some("timer-chime.caf"),
            TimerSound::Bell => Some("timer-bell.caf"),
            TimerSound::Default | TimerSound::None => None,
        }
    }
}

impl fmt::Display for TimerSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerSound {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimerSound::ALL
            .into_iter()
            .find(|sound| sound.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SoundError::UnknownSound(s.to_string()))
    }
}
