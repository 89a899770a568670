//! Process-wide timer store.
//!
//! This module provides the state shared between the cook-mode screen and
//! the floating timer:
//! - Step timers keyed by step index
//! - The active cooking session record
//! - Wall-clock recomputation of remaining time
//! - Event publishing for consumers that re-render on change

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::types::{CookingSession, Location, SessionUpdate, TimerMap, TimerState};

// ============================================================================
// StoreEvent
// ============================================================================

/// Events published by the store after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The timer map was replaced or recomputed
    TimersUpdated {
        /// Snapshot after the change
        timers: TimerMap,
    },
    /// A session began
    SessionStarted {
        /// Recipe being cooked
        recipe_id: String,
    },
    /// The session record was partially updated
    SessionUpdated {
        /// Snapshot after the merge
        session: CookingSession,
    },
    /// The session and all timers were cleared
    SessionEnded,
    /// A running timer reached zero during a recomputation
    TimerElapsed {
        /// Step index of the timer
        step: u32,
    },
}

// ============================================================================
// TimerStore
// ============================================================================

/// Owner of the timer map and the session record.
///
/// Every mutation happens inside one `&mut self` call, so a consumer holding
/// the store's lock always observes a whole transition.
pub struct TimerStore {
    /// Timers keyed by step index
    timers: TimerMap,
    /// Active session, if any
    session: Option<CookingSession>,
    /// Last known navigation location
    location: Location,
    /// Wall clock
    clock: Arc<dyn Clock>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<StoreEvent>,
}

impl TimerStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>, event_tx: mpsc::UnboundedSender<StoreEvent>) -> Self {
        Self {
            timers: TimerMap::new(),
            session: None,
            location: Location::default(),
            clock,
            event_tx,
        }
    }

    /// Returns the current timers.
    pub fn timers(&self) -> &TimerMap {
        &self.timers
    }

    /// Returns the active session.
    pub fn session(&self) -> Option<&CookingSession> {
        self.session.as_ref()
    }

    /// Returns the last known navigation location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the store's clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Replaces the whole timer map.
    pub fn sync_timers(&mut self, timers: TimerMap) {
        if timers == self.timers {
            return;
        }
        self.timers = timers;
        self.emit(StoreEvent::TimersUpdated {
            timers: self.timers.clone(),
        });
    }

    /// Records the start of a cooking session.
    pub fn start_session(&mut self, session: CookingSession) {
        info!(
            recipe_id = %session.recipe_id,
            title = %session.recipe_title,
            "Cooking session started"
        );
        let recipe_id = session.recipe_id.clone();
        self.session = Some(session);
        self.emit(StoreEvent::SessionStarted { recipe_id });
    }

    /// Merges a partial update into the active session.
    ///
    /// Does nothing when no session is active.
    pub fn update_session(&mut self, update: SessionUpdate) {
        let Some(session) = self.session.as_mut() else {
            debug!("update_session ignored: no active session");
            return;
        };
        session.apply(update);
        let snapshot = session.clone();
        self.emit(StoreEvent::SessionUpdated { session: snapshot });
    }

    /// Clears the session and every timer.
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(recipe_id = %session.recipe_id, "Cooking session ended");
        }
        self.timers.clear();
        self.emit(StoreEvent::SessionEnded);
    }

    /// Updates the navigation location.
    pub fn set_location(&mut self, location: Location) {
        debug!(?location, "Location changed");
        self.location = location;
    }

    /// Returns true while the cook-mode screen is presented.
    pub fn is_in_cook_mode(&self) -> bool {
        self.location.is_cook_mode()
    }

    /// Returns true when the store itself should drive the countdown.
    pub fn should_tick(&self) -> bool {
        !self.is_in_cook_mode() && !self.timers.is_empty()
    }

    /// Returns the timers that still have time left.
    pub fn active_timers(&self) -> impl Iterator<Item = (&u32, &TimerState)> {
        self.timers.iter().filter(|(_, timer)| timer.is_active())
    }

    /// Rederives `remaining` of every running timer from its end time.
    ///
    /// All changes are applied as one update and published once. Timers that
    /// reach zero stay in the map. Returns true if anything changed.
    pub fn recompute(&mut self) -> bool {
        let now = self.clock.now_ms();
        let mut next = self.timers.clone();
        let mut elapsed = Vec::new();
        let mut changed = false;

        for (step, timer) in next.iter_mut() {
            let was_active = timer.is_active();
            if timer.recompute(now) {
                changed = true;
                if was_active && timer.is_elapsed() {
                    elapsed.push(*step);
                }
            }
        }

        if !changed {
            return false;
        }

        debug!(now, timers = next.len(), "Timers recomputed");
        self.timers = next;
        self.emit(StoreEvent::TimersUpdated {
            timers: self.timers.clone(),
        });
        for step in elapsed {
            info!(step, "Step timer elapsed");
            self.emit(StoreEvent::TimerElapsed { step });
        }
        true
    }

    /// Sends an event, ignoring a closed channel.
    fn emit(&self, event: StoreEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Store event dropped: no subscriber");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
