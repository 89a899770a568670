//! Integration tests for the cook-mode timer core.
//!
//! These tests drive the public API the way the app does:
//! - Cook mode starts timers and schedules notifications
//! - Leaving cook mode hands the countdown to the store
//! - Background/foreground transitions resync from the wall clock
//! - The floating timer follows the store

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use cook_timer::clock::{remaining_seconds, Clock, ManualClock};
use cook_timer::notification::{MockNotificationScheduler, SharedNotifier, TimerNotifier};
use cook_timer::overlay::floating_timer;
use cook_timer::sound::TimerSound;
use cook_timer::store::{
    shared_store, LifecycleListener, SharedStore, StoreEvent, StoreTicker,
};
use cook_timer::types::{AppState, CookingSession, Location};
use cook_timer::CookModeController;

// ============================================================================
// Test Helpers
// ============================================================================

type Mock = Arc<MockNotificationScheduler>;

struct App {
    clock: Arc<ManualClock>,
    store: SharedStore,
    events: mpsc::UnboundedReceiver<StoreEvent>,
    scheduler: Mock,
    notifier: SharedNotifier<Mock>,
    controller: CookModeController<Mock>,
    lifecycle: LifecycleListener<Mock>,
}

/// Builds the whole timer core on a manual clock.
fn create_app() -> App {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let (store, events) = shared_store(clock.clone());
    let scheduler = Arc::new(MockNotificationScheduler::with_clock(clock.clone()));
    let notifier = Arc::new(Mutex::new(TimerNotifier::new(
        scheduler.clone(),
        clock.clone(),
    )));
    let controller = CookModeController::new(store.clone(), notifier.clone(), clock.clone())
        .with_sound(TimerSound::Bell);
    let lifecycle = LifecycleListener::new(store.clone(), notifier.clone());
    App {
        clock,
        store,
        events,
        scheduler,
        notifier,
        controller,
        lifecycle,
    }
}

fn pasta() -> CookingSession {
    CookingSession::new("pasta", "Tomato pasta", 4).with_servings(2)
}

fn home() -> Location {
    Location::Home
}

fn drain(events: &mut mpsc::UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Runs a 60 s timer in the background for `gap`, then lets the ticker and
/// the foreground resync both observe the same instant in the given order.
async fn resync_after(gap: Duration, ticker_first: bool) -> (App, Vec<StoreEvent>) {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(1, 60, "Simmer").await.unwrap();
    app.controller.leave(home()).await;
    app.lifecycle.on_app_state_change(AppState::Background).await;
    drain(&mut app.events);

    app.clock.advance(gap);
    let ticker = StoreTicker::new(app.store.clone());
    if ticker_first {
        ticker.tick_once().await;
        app.lifecycle.on_app_state_change(AppState::Active).await;
    } else {
        app.lifecycle.on_app_state_change(AppState::Active).await;
        ticker.tick_once().await;
    }

    let events = drain(&mut app.events);
    (app, events)
}

fn elapsed_steps(events: &[StoreEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            StoreEvent::TimerElapsed { step } => Some(*step),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_timer_finishes_while_app_is_suspended() {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller
        .start_step_timer(2, 60, "Simmer the sauce")
        .await
        .unwrap();

    let pending = app.scheduler.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].body, "ステップ 3: Simmer the sauce");
    assert_eq!(pending[0].sound, TimerSound::Bell);

    app.controller.leave(home()).await;
    app.lifecycle.on_app_state_change(AppState::Background).await;
    app.clock.advance(Duration::from_secs(65));
    let delivered = app.scheduler.deliver_due(app.clock.now_ms());
    assert_eq!(delivered.len(), 1);

    app.lifecycle.on_app_state_change(AppState::Active).await;

    let store = app.store.lock().await;
    assert_eq!(store.timers()[&2].remaining, 0);
    assert!(app.notifier.lock().await.scheduled(2).is_none());
    assert!(floating_timer(&store).is_none());
}

#[tokio::test]
async fn test_foreground_after_short_gap_shows_fresh_time() {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(0, 300, "Boil water").await.unwrap();
    app.controller.leave(home()).await;

    app.lifecycle.on_app_state_change(AppState::Background).await;
    app.clock.advance(Duration::from_secs(10));
    app.lifecycle.on_app_state_change(AppState::Active).await;

    let store = app.store.lock().await;
    assert_eq!(store.timers()[&0].remaining, 290);
    let floating = floating_timer(&store).unwrap();
    assert_eq!(floating.label(), "4:50");
    assert_eq!(floating.recipe_title, "Tomato pasta");
}

#[tokio::test]
async fn test_remaining_always_matches_end_time() {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(1, 90, "Knead").await.unwrap();
    app.controller.leave(home()).await;
    let ticker = StoreTicker::new(app.store.clone());

    for step_ms in [250, 999, 1, 3_750, 45_000, 60_000] {
        app.clock.advance(Duration::from_millis(step_ms));
        ticker.tick_once().await;

        let store = app.store.lock().await;
        let timer = &store.timers()[&1];
        assert_eq!(
            timer.remaining,
            remaining_seconds(timer.end_time, app.clock.now_ms())
        );
    }
}

#[tokio::test]
async fn test_pause_resume_across_navigation() {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(1, 120, "Rest the dough").await.unwrap();

    app.clock.advance(Duration::from_secs(30));
    app.controller.tick().await;
    app.controller.pause_step_timer(1).await.unwrap();
    app.controller.leave(home()).await;

    // Paused timers do not move while away
    app.clock.advance(Duration::from_secs(600));
    StoreTicker::new(app.store.clone()).tick_once().await;
    assert_eq!(app.store.lock().await.timers()[&1].remaining, 90);
    assert!(app.scheduler.pending().is_empty());

    app.controller.enter(pasta()).await;
    app.controller.resume_step_timer(1).await.unwrap();

    let pending = app.scheduler.pending();
    assert_eq!(pending.len(), 1);
    let expected = app.clock.now_ms() + 90_000;
    assert!(pending[0].fire_at_ms.abs_diff(expected) <= 1_000);
}

#[tokio::test]
async fn test_exit_clears_store_and_notifications() {
    let mut app = create_app();
    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(0, 60, "Boil").await.unwrap();
    app.controller.start_step_timer(3, 600, "Bake").await.unwrap();
    assert_eq!(app.scheduler.pending().len(), 2);

    app.controller.exit().await;

    let store = app.store.lock().await;
    assert!(store.timers().is_empty());
    assert!(store.session().is_none());
    assert!(app.scheduler.pending().is_empty());
    assert_eq!(app.notifier.lock().await.scheduled_count(), 0);

    let mut saw_end = false;
    while let Ok(event) = app.events.try_recv() {
        saw_end |= event == StoreEvent::SessionEnded;
    }
    assert!(saw_end);
}

#[tokio::test]
async fn test_denied_permission_keeps_timers_running() {
    let mut app = create_app();
    app.scheduler.set_authorized(false);
    app.scheduler.set_grant_on_request(false);

    app.controller.enter(pasta()).await;
    app.controller.start_step_timer(0, 30, "Stir").await.unwrap();

    assert!(app.notifier.lock().await.permission_denied());
    assert!(app.scheduler.pending().is_empty());
    assert_eq!(app.store.lock().await.timers()[&0].remaining, 30);

    app.clock.advance(Duration::from_secs(30));
    assert_eq!(app.controller.tick().await, vec![0]);
}

#[tokio::test]
async fn test_spawned_ticker_drives_store_outside_cook_mode() {
    let clock: Arc<dyn Clock> = Arc::new(cook_timer::SystemClock);
    let (store, _events) = shared_store(clock.clone());
    let scheduler = Arc::new(MockNotificationScheduler::new());
    let notifier = Arc::new(Mutex::new(TimerNotifier::new(scheduler, clock.clone())));
    let mut controller = CookModeController::new(store.clone(), notifier, clock);

    controller.enter(pasta()).await;
    controller.start_step_timer(0, 30, "Stir").await.unwrap();
    controller.leave(home()).await;

    let handle = StoreTicker::new(store.clone())
        .with_period(Duration::from_millis(100))
        .spawn();
    tokio::time::sleep(Duration::from_millis(2_300)).await;
    handle.shutdown().await;

    let remaining = store.lock().await.timers()[&0].remaining;
    assert!((27..=28).contains(&remaining), "remaining = {}", remaining);
}

#[tokio::test]
async fn test_ticker_and_foreground_resync_converge_in_either_order() {
    for gap in [Duration::from_secs(10), Duration::from_secs(65)] {
        let (ticked, ticked_events) = resync_after(gap, true).await;
        let (resumed, resumed_events) = resync_after(gap, false).await;

        let ticked_timers = ticked.store.lock().await.timers().clone();
        let resumed_timers = resumed.store.lock().await.timers().clone();
        assert_eq!(ticked_timers, resumed_timers);
        assert_eq!(
            ticked_timers[&1].remaining,
            remaining_seconds(ticked_timers[&1].end_time, ticked.clock.now_ms())
        );

        let expected: Vec<u32> = if gap > Duration::from_secs(60) {
            vec![1]
        } else {
            Vec::new()
        };
        assert_eq!(elapsed_steps(&ticked_events), expected);
        assert_eq!(elapsed_steps(&resumed_events), expected);
    }
}
