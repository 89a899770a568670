//! Floating timer shown outside cook mode.
//!
//! A read-only view of the store: which timer to show, how to format it and
//! how far along it is. It never writes to the store.

use serde::Serialize;

use crate::store::TimerStore;
use crate::types::TimerState;

/// What the floating timer displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingTimer {
    /// Recipe the timers belong to
    pub recipe_title: String,
    /// Step index of the featured timer
    pub step: u32,
    /// Seconds left on the featured timer
    pub remaining: u32,
    /// Full duration of the featured timer
    pub total: u32,
    /// Whether the featured timer is paused
    pub is_paused: bool,
    /// Step text of the featured timer
    pub step_text: String,
    /// Number of other active timers
    pub others: usize,
    /// Fraction of the featured timer already spent
    pub progress: f32,
}

impl FloatingTimer {
    /// Remaining time as `m:ss`.
    pub fn label(&self) -> String {
        format_remaining(self.remaining)
    }
}

/// Builds the floating timer for the store's current state.
///
/// Returns `None` unless a session exists, the cook-mode screen is not
/// presented, and at least one timer has time left. Running timers are
/// preferred over paused ones; among those the one ending soonest wins.
pub fn floating_timer(store: &TimerStore) -> Option<FloatingTimer> {
    let session = store.session()?;
    if store.is_in_cook_mode() {
        return None;
    }

    let active: Vec<(u32, &TimerState)> = store
        .active_timers()
        .map(|(step, timer)| (*step, timer))
        .collect();
    let (step, featured) = active
        .iter()
        .min_by_key(|(step, timer)| (timer.is_paused, timer.remaining, *step))
        .copied()?;

    Some(FloatingTimer {
        recipe_title: session.recipe_title.clone(),
        step,
        remaining: featured.remaining,
        total: featured.total,
        is_paused: featured.is_paused,
        step_text: featured.step_text.clone(),
        others: active.len() - 1,
        progress: featured.progress(),
    })
}

/// Formats seconds as `m:ss`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
