//! Sound selection error types.

use thiserror::Error;

/// Errors that can occur when selecting a timer sound.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// The name does not match any known sound.
    #[error("不明なサウンドです: {0}")]
    UnknownSound(String),
}

impl SoundError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownSound(_) => "default, chime, bell, none のいずれかを指定してください",
        }
    }
}
