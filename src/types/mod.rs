//! Core data types for cook-mode timers.
//!
//! This module defines the data structures used for:
//! - Per-step timer state
//! - The cooking session record
//! - Navigation location and app lifecycle state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clock::{end_time_after, remaining_seconds};

/// Timers keyed by recipe step index.
pub type TimerMap = BTreeMap<u32, TimerState>;

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state of a single recipe step.
///
/// While running, `end_time` is the absolute epoch-millisecond deadline and
/// `remaining` is always derivable from it. While paused, `end_time` is `0`
/// and `remaining` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds left
    pub remaining: u32,
    /// Full duration in seconds
    pub total: u32,
    /// Whether the countdown is paused
    pub is_paused: bool,
    /// Absolute deadline in epoch ms, or 0 while paused
    pub end_time: u64,
    /// Step text shown next to the timer
    pub step_text: String,
}

impl TimerState {
    /// Creates a timer that starts counting down at `now_ms`.
    pub fn running(total: u32, step_text: impl Into<String>, now_ms: u64) -> Self {
        Self {
            remaining: total,
            total,
            is_paused: false,
            end_time: end_time_after(now_ms, total),
            step_text: step_text.into(),
        }
    }

    /// Pauses the countdown, freezing `remaining` at its value for `now_ms`.
    pub fn pause(&mut self, now_ms: u64) {
        if self.is_paused {
            return;
        }
        self.recompute(now_ms);
        self.is_paused = true;
        self.end_time = 0;
    }

    /// Resumes the countdown with a fresh deadline of `now + remaining`.
    pub fn resume(&mut self, now_ms: u64) {
        if !self.is_paused {
            return;
        }
        self.is_paused = false;
        self.end_time = end_time_after(now_ms, self.remaining);
    }

    /// Rederives `remaining` from `end_time`.
    ///
    /// Returns true if the value changed. Paused timers are left alone.
    pub fn recompute(&mut self, now_ms: u64) -> bool {
        if self.is_paused || self.end_time == 0 {
            return false;
        }
        let remaining = remaining_seconds(self.end_time, now_ms);
        if remaining == self.remaining {
            return false;
        }
        self.remaining = remaining;
        true
    }

    /// Returns true while there is time left on the clock.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Returns true if the timer is running and has hit zero.
    pub fn is_elapsed(&self) -> bool {
        !self.is_paused && self.remaining == 0
    }

    /// Fraction of the duration already spent, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        let spent = self.total.saturating_sub(self.remaining);
        spent as f32 / self.total as f32
    }
}

// ============================================================================
// CookingSession
// ============================================================================

/// The recipe currently being cooked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSession {
    /// Recipe identifier
    pub recipe_id: String,
    /// Recipe title
    pub recipe_title: String,
    /// Zero-based index of the step on screen
    pub current_step: u32,
    /// Number of steps in the recipe
    pub total_steps: u32,
    /// Ingredient scale factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    /// Servings the recipe was scaled to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
}

impl CookingSession {
    /// Creates a session positioned on the first step.
    pub fn new(
        recipe_id: impl Into<String>,
        recipe_title: impl Into<String>,
        total_steps: u32,
    ) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            recipe_title: recipe_title.into(),
            current_step: 0,
            total_steps,
            scale_factor: None,
            servings: None,
        }
    }

    /// Sets the scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = Some(scale_factor);
        self
    }

    /// Sets the servings.
    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    /// Merges the fields present in `update` into this session.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(title) = update.recipe_title {
            self.recipe_title = title;
        }
        if let Some(step) = update.current_step {
            self.current_step = step;
        }
        if let Some(total) = update.total_steps {
            self.total_steps = total;
        }
        if let Some(scale) = update.scale_factor {
            self.scale_factor = Some(scale);
        }
        if let Some(servings) = update.servings {
            self.servings = Some(servings);
        }
    }
}

/// Partial update for a [`CookingSession`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
}

impl SessionUpdate {
    /// Update that only moves the current step.
    pub fn step(current_step: u32) -> Self {
        Self {
            current_step: Some(current_step),
            ..Self::default()
        }
    }
}

// ============================================================================
// Location
// ============================================================================

/// Where the user currently is in the app.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Location {
    /// Any screen outside cook mode
    #[default]
    Home,
    /// Recipe detail page
    Recipe {
        #[serde(rename = "recipeId")]
        recipe_id: String,
    },
    /// The cook-mode screen, which drives its own countdown
    CookMode {
        #[serde(rename = "recipeId")]
        recipe_id: String,
    },
}

impl Location {
    /// Returns true for the cook-mode screen.
    pub fn is_cook_mode(&self) -> bool {
        matches!(self, Location::CookMode { .. })
    }
}

// ============================================================================
// AppState
// ============================================================================

/// OS-reported application lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    /// In the foreground and receiving events
    #[default]
    Active,
    /// Transitioning, e.g. the app switcher is open
    Inactive,
    /// Suspended in the background
    Background,
}

impl AppState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Active => "active",
            AppState::Inactive => "inactive",
            AppState::Background => "background",
        }
    }

    /// Returns true for states in which timers may drift unobserved.
    pub fn is_away(&self) -> bool {
        matches!(self, AppState::Inactive | AppState::Background)
    }
}

// ============================================================================
// Tests
// ============================================================================
