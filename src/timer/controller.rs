//! Timer controller
//!
//! Owns one timer's state, applies reducer actions to it, and mirrors every
//! transition into the snapshot store and the running flag the countdown
//! driver listens to.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    clock::Clock,
    reducer::{reduce, Action},
    restore::restore,
};
use crate::{
    state::{Phase, Preferences, TimerKind, TimerSnapshot, TimerState},
    storage::{KeyValueStore, SnapshotStore},
};

/// Single controller for one [`TimerKind`]
pub struct TimerController {
    kind: TimerKind,
    state: Mutex<TimerState>,
    store: SnapshotStore,
    preferences: Arc<Preferences>,
    clock: Arc<dyn Clock>,
    running_tx: watch::Sender<bool>,
}

impl TimerController {
    /// Build the controller and rehydrate whatever was persisted for `kind`
    pub fn mount(
        kind: TimerKind,
        backend: Arc<dyn KeyValueStore>,
        preferences: Arc<Preferences>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let default_duration = preferences.duration_seconds(kind);
        let (running_tx, _) = watch::channel(false);

        let controller = Arc::new(Self {
            kind,
            state: Mutex::new(TimerState::idle(default_duration)),
            store: SnapshotStore::new(kind.storage_key(), backend),
            preferences,
            clock,
            running_tx,
        });

        match controller.store.get() {
            Some(snapshot) => match snapshot.into_state(kind) {
                Ok(persisted) => {
                    let restored = restore(persisted, default_duration, controller.clock.now());
                    info!(
                        "Restored {} timer: phase={}, remaining={}s",
                        kind,
                        kind.phase_label(restored.phase),
                        restored.remaining_seconds
                    );
                    controller.dispatch(Action::Restore(restored));
                }
                Err(e) => {
                    warn!("Discarding {} timer snapshot: {:#}", kind, e);
                    controller.dispatch(Action::Restore(TimerState::idle(default_duration)));
                }
            },
            None => {
                debug!("No persisted {} timer, starting idle", kind);
                controller.dispatch(Action::Restore(TimerState::idle(default_duration)));
            }
        }

        controller
    }

    /// Get a copy of the current state
    pub fn state(&self) -> TimerState {
        self.lock_state().clone()
    }

    /// Receiver that is `true` while the timer is running
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Start a session for `task_id` at the configured duration
    pub fn start(&self, task_id: Option<String>) -> TimerState {
        info!("Starting {} timer for task {:?}", self.kind, task_id);
        self.dispatch(Action::Start {
            task_id,
            duration: self.default_duration(),
            now: self.clock.now(),
        })
    }

    /// Cancel the current session
    pub fn stop(&self) -> TimerState {
        info!("Stopping {} timer", self.kind);
        self.dispatch(Action::UserStop {
            default_duration: self.default_duration(),
        })
    }

    /// Advance the countdown by one second
    pub fn tick(&self) -> TimerState {
        self.dispatch(Action::Tick {
            default_duration: self.default_duration(),
        })
    }

    fn default_duration(&self) -> u64 {
        self.preferences.duration_seconds(self.kind)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `action`, then persist and publish the result.
    ///
    /// Everything happens under the state lock so ticks and user actions are
    /// applied one at a time.
    fn dispatch(&self, action: Action) -> TimerState {
        let mut state = self.lock_state();
        let previous_phase = state.phase;
        let next = reduce(&state, action);

        if next.is_completed() && previous_phase == Phase::Running {
            info!(
                "{} session finished for task {:?}",
                self.kind, next.active_task_id
            );
        } else if next.is_running() {
            debug!("{} timer: {}s remaining", self.kind, next.remaining_seconds);
        }

        self.persist(&next);
        *state = next.clone();
        drop(state);

        self.running_tx.send_if_modified(|running| {
            let changed = *running != next.is_running();
            *running = next.is_running();
            changed
        });

        next
    }

    fn persist(&self, state: &TimerState) {
        let keep = match state.phase {
            Phase::Idle => self.kind.persists_idle_with_task() && state.active_task_id.is_some(),
            Phase::Running | Phase::Completed => true,
        };

        if !keep {
            self.store.remove();
            return;
        }

        let mut snapshot = TimerSnapshot::from_state(self.kind, state);
        if state.is_running() {
            // remaining_seconds is what is left as of now, so anchor it here
            snapshot.start_timestamp = Some(self.clock.now());
        }
        self.store.set(&snapshot);
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("kind", &self.kind)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::TimerPreferences,
        storage::{FileStore, MemoryStore},
        timer::clock::ManualClock,
    };
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    struct Harness {
        backend: Arc<dyn KeyValueStore>,
        preferences: Arc<Preferences>,
        clock: Arc<ManualClock>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_backend(Arc::new(MemoryStore::new()))
        }

        fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
            Self {
                backend,
                preferences: Arc::new(Preferences::default()),
                clock: Arc::new(ManualClock::new(
                    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                )),
            }
        }

        fn mount(&self, kind: TimerKind) -> Arc<TimerController> {
            TimerController::mount(
                kind,
                Arc::clone(&self.backend),
                Arc::clone(&self.preferences),
                self.clock.clone(),
            )
        }

        fn snapshot(&self, kind: TimerKind) -> Option<TimerSnapshot> {
            SnapshotStore::new(kind.storage_key(), Arc::clone(&self.backend)).get()
        }
    }

    #[test]
    fn test_mount_without_snapshot_is_idle() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);
        let breaks = harness.mount(TimerKind::Break);

        assert_eq!(focus.state(), TimerState::idle(1500));
        assert_eq!(breaks.state(), TimerState::idle(300));
        assert_eq!(harness.snapshot(TimerKind::Focus), None);
    }

    #[test]
    fn test_start_runs_at_configured_duration() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);

        let state = focus.start(Some("task-1".to_string()));
        assert_eq!(state.active_task_id.as_deref(), Some("task-1"));
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.start_timestamp, Some(harness.clock.now()));
        assert!(*focus.subscribe_running().borrow());

        let snapshot = harness.snapshot(TimerKind::Focus).unwrap();
        assert_eq!(snapshot.phase, "running");
        assert_eq!(snapshot.remaining_seconds, 1500);
    }

    #[test]
    fn test_full_focus_session() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);
        focus.start(Some("task-1".to_string()));

        for _ in 0..1500 {
            focus.tick();
        }

        let state = focus.state();
        assert_eq!(state.active_task_id.as_deref(), Some("task-1"));
        assert_eq!(state.phase, Phase::Completed);
        assert_eq!(state.remaining_seconds, 1500);
        assert!(!*focus.subscribe_running().borrow());

        let snapshot = harness.snapshot(TimerKind::Focus).unwrap();
        assert_eq!(snapshot.phase, "completed");
        assert_eq!(snapshot.active_task_id.as_deref(), Some("task-1"));
    }

    #[test]
    fn test_break_completion_label() {
        let harness = Harness::new();
        let breaks = harness.mount(TimerKind::Break);
        breaks.start(None);
        for _ in 0..300 {
            breaks.tick();
        }

        assert!(breaks.state().is_completed());
        assert_eq!(harness.snapshot(TimerKind::Break).unwrap().phase, "breakEnded");
    }

    #[test]
    fn test_stop_clears_task_and_snapshot() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);
        focus.start(Some("task-1".to_string()));
        focus.tick();

        let state = focus.stop();
        assert_eq!(state, TimerState::idle(1500));
        assert_eq!(focus.stop(), state);
        assert_eq!(harness.snapshot(TimerKind::Focus), None);
    }

    #[test]
    fn test_preference_change_does_not_touch_running_timer() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);
        focus.start(Some("task-1".to_string()));

        harness
            .preferences
            .update(crate::state::PreferencesUpdate {
                focus_duration_minutes: Some(50),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(focus.tick().remaining_seconds, 1499);
        assert_eq!(focus.stop().remaining_seconds, 3000);
    }

    #[test]
    fn test_remount_reconciles_elapsed_time() {
        let harness = Harness::new();
        let focus = harness.mount(TimerKind::Focus);
        focus.start(Some("task-1".to_string()));
        for _ in 0..10 {
            harness.clock.advance(Duration::seconds(1));
            focus.tick();
        }
        drop(focus);

        // 90 seconds pass with nothing ticking
        harness.clock.advance(Duration::seconds(90));
        let focus = harness.mount(TimerKind::Focus);

        let state = focus.state();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.remaining_seconds, 1400);
        assert_eq!(state.active_task_id.as_deref(), Some("task-1"));
        assert!(*focus.subscribe_running().borrow());
    }

    #[test]
    fn test_remount_after_expiry_completes() {
        let harness = Harness::new();
        let breaks = harness.mount(TimerKind::Break);
        breaks.start(Some("task-1".to_string()));
        drop(breaks);

        harness.clock.advance(Duration::seconds(400));
        let breaks = harness.mount(TimerKind::Break);

        let state = breaks.state();
        assert_eq!(state.phase, Phase::Completed);
        assert_eq!(state.remaining_seconds, 300);
        assert_eq!(state.active_task_id.as_deref(), Some("task-1"));
        assert_eq!(harness.snapshot(TimerKind::Break).unwrap().phase, "breakEnded");
    }

    #[test]
    fn test_focus_keeps_idle_snapshot_with_task() {
        let harness = Harness::new();
        let snapshot = TimerSnapshot {
            active_task_id: Some("task-1".to_string()),
            phase: "idle".to_string(),
            remaining_seconds: 1500,
            start_timestamp: None,
        };
        for kind in TimerKind::ALL {
            SnapshotStore::new(kind.storage_key(), Arc::clone(&harness.backend)).set(&snapshot);
        }

        let focus = harness.mount(TimerKind::Focus);
        let breaks = harness.mount(TimerKind::Break);

        assert_eq!(focus.state().active_task_id.as_deref(), Some("task-1"));
        assert!(harness.snapshot(TimerKind::Focus).is_some());
        assert_eq!(breaks.state().active_task_id.as_deref(), Some("task-1"));
        assert_eq!(harness.snapshot(TimerKind::Break), None);
    }

    #[test]
    fn test_unknown_phase_falls_back_to_idle() {
        let harness = Harness::new();
        harness
            .backend
            .set_item(
                TimerKind::Focus.storage_key(),
                r#"{"activeTaskId":"task-1","phase":"breakEnded","remainingSeconds":5,"startTimestamp":null}"#,
            )
            .unwrap();

        let focus = harness.mount(TimerKind::Focus);
        assert_eq!(focus.state(), TimerState::idle(1500));
        assert_eq!(harness.snapshot(TimerKind::Focus), None);
    }

    #[test]
    fn test_out_of_range_snapshot_falls_back_to_idle() {
        let harness = Harness::new();
        harness
            .backend
            .set_item(
                TimerKind::Focus.storage_key(),
                r#"{"activeTaskId":"t","phase":"running","remainingSeconds":18446744073709551615,"startTimestamp":"2999-01-01T00:00:00Z"}"#,
            )
            .unwrap();

        let focus = harness.mount(TimerKind::Focus);
        assert_eq!(focus.state(), TimerState::idle(1500));
        assert_eq!(harness.snapshot(TimerKind::Focus), None);
    }

    #[test]
    fn test_future_start_timestamp_does_not_panic() {
        let harness = Harness::new();
        harness
            .backend
            .set_item(
                TimerKind::Focus.storage_key(),
                r#"{"activeTaskId":"t","phase":"running","remainingSeconds":600,"startTimestamp":"2999-01-01T00:00:00Z"}"#,
            )
            .unwrap();

        let state = harness.mount(TimerKind::Focus).state();
        assert!(state.is_running());
        assert!(state.remaining_seconds >= 600);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_idle() {
        let harness = Harness::new();
        harness
            .backend
            .set_item(TimerKind::Break.storage_key(), "][")
            .unwrap();

        let breaks = harness.mount(TimerKind::Break);
        assert_eq!(breaks.state(), TimerState::idle(300));
    }

    #[test]
    fn test_works_without_usable_storage() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let harness = Harness::with_backend(Arc::new(FileStore::new(&blocker)));
        let focus = harness.mount(TimerKind::Focus);
        focus.start(Some("task-1".to_string()));
        assert_eq!(focus.tick().remaining_seconds, 1499);
        assert_eq!(focus.stop(), TimerState::idle(1500));
    }

    #[test]
    fn test_custom_preferences_at_mount() {
        let harness = Harness {
            preferences: Arc::new(Preferences::new(TimerPreferences {
                focus_duration_minutes: 45,
                break_duration_minutes: 15,
            })),
            ..Harness::new()
        };

        assert_eq!(harness.mount(TimerKind::Focus).state().remaining_seconds, 2700);
        assert_eq!(harness.mount(TimerKind::Break).state().remaining_seconds, 900);
    }
}
