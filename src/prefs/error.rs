//! Error types for the preferences store.

use std::io;
use thiserror::Error;

/// Preferences store error type.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Data directory not found.
    #[error("Failed to get data directory")]
    DataDirectoryNotFound,

    /// Failed to create directory.
    #[error("Failed to create directory: {0}")]
    DirectoryCreation(#[source] io::Error),

    /// Failed to read the preferences file.
    #[error("Failed to read preferences file: {0}")]
    Read(#[source] io::Error),

    /// Failed to write the preferences file.
    #[error("Failed to write preferences file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize a value.
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A stored value could not be interpreted.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue {
        /// Preference key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Result type for preferences operations.
pub type Result<T> = std::result::Result<T, PrefsError>;
