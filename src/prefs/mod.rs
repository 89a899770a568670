//! On-device preferences.
//!
//! A small key-value store persisted as one JSON object of string values,
//! mirroring the app's async key-value storage. Structured values such as
//! chat history are JSON-encoded into their string slot.
//!
//! Reads never fail the caller: a missing file is empty preferences, and a
//! corrupt file or a malformed value is logged and treated as absent.
//!
//! # Example
//!
//! ```no_run
//! use cook_timer::prefs::{Preferences, ThemePreference};
//!
//! let mut prefs = Preferences::load_default()?;
//! prefs.set_theme(ThemePreference::Dark);
//! prefs.save()?;
//! # Ok::<(), cook_timer::prefs::PrefsError>(())
//! ```

pub mod error;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sound::TimerSound;

pub use error::{PrefsError, Result};

/// Directory name under the platform data directory.
const APP_DIR: &str = "cook-timer";

/// File name of the preferences file.
const PREFS_FILE: &str = "preferences.json";

/// Storage keys.
pub mod keys {
    /// Theme choice
    pub const THEME: &str = "theme";
    /// Timer sound choice
    pub const TIMER_SOUND: &str = "timer_sound";
    /// Prefix of per-recipe chat history keys
    pub const CHAT_HISTORY_PREFIX: &str = "chat_history_";

    /// Key holding the chat history of `recipe_id`.
    pub fn chat_history(recipe_id: &str) -> String {
        format!("{}{}", CHAT_HISTORY_PREFIX, recipe_id)
    }
}

// ============================================================================
// ThemePreference
// ============================================================================

/// Color scheme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS setting
    #[default]
    System,
}

impl ThemePreference {
    /// Returns the string representation of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            _ => Err(PrefsError::InvalidValue {
                key: keys::THEME.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// ChatMessage
// ============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of the recipe assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Key-value preferences backed by a JSON file.
#[derive(Debug, Clone)]
pub struct Preferences {
    /// Backing file
    path: PathBuf,
    /// Stored values
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Returns the default preferences file path.
    ///
    /// # Errors
    /// Returns an error if the platform data directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or(PrefsError::DataDirectoryNotFound)?;
        Ok(data_dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// Loads preferences from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    /// Loads preferences from `path`.
    ///
    /// A missing file yields empty preferences. A corrupt file is logged and
    /// also yields empty preferences.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = match fs::read(&path) {
            Ok(raw) => match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(e) => {
                    warn!("設定ファイルが破損しています。初期値を使用します ({}): {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PrefsError::Read(e)),
        };

        debug!(path = %path.display(), keys = values.len(), "Preferences loaded");
        Ok(Self { path, values })
    }

    /// Writes the preferences to disk, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PrefsError::DirectoryCreation)?;
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(PrefsError::Serialize)?;
        fs::write(&self.path, json).map_err(PrefsError::Write)?;
        debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets the raw value of `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes `key`. Returns true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Returns the saved theme, defaulting to [`ThemePreference::System`].
    pub fn theme(&self) -> ThemePreference {
        self.parsed(keys::THEME)
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.set(keys::THEME, theme.as_str());
    }

    /// Returns the saved timer sound, defaulting to [`TimerSound::Default`].
    pub fn timer_sound(&self) -> TimerSound {
        self.parsed(keys::TIMER_SOUND)
    }

    pub fn set_timer_sound(&mut self, sound: TimerSound) {
        self.set(keys::TIMER_SOUND, sound.as_str());
    }

    /// Returns the chat history of `recipe_id`.
    ///
    /// Malformed history is logged and treated as empty.
    pub fn chat_history(&self, recipe_id: &str) -> Vec<ChatMessage> {
        let key = keys::chat_history(recipe_id);
        let Some(raw) = self.get(&key) else {
            return Vec::new();
        };

        match serde_json::from_str(raw) {
            Ok(history) => history,
            Err(e) => {
                warn!("チャット履歴を読み込めませんでした (recipe {}): {}", recipe_id, e);
                Vec::new()
            }
        }
    }

    /// Replaces the chat history of `recipe_id`.
    pub fn set_chat_history(&mut self, recipe_id: &str, history: &[ChatMessage]) -> Result<()> {
        let json = serde_json::to_string(history).map_err(PrefsError::Serialize)?;
        self.set(keys::chat_history(recipe_id), json);
        Ok(())
    }

    /// Appends one message to the chat history of `recipe_id`.
    pub fn push_chat_message(&mut self, recipe_id: &str, message: ChatMessage) -> Result<()> {
        let mut history = self.chat_history(recipe_id);
        history.push(message);
        self.set_chat_history(recipe_id, &history)
    }

    /// Deletes the chat history of `recipe_id`.
    pub fn clear_chat_history(&mut self, recipe_id: &str) -> bool {
        self.remove(&keys::chat_history(recipe_id))
    }

    fn parsed<T>(&self, key: &str) -> T
    where
        T: FromStr + Default,
        T::Err: fmt::Display,
    {
        match self.get(key).map(str::parse::<T>) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                warn!("設定値を読み込めませんでした ({}): {}", key, e);
                T::default()
            }
            None => T::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
