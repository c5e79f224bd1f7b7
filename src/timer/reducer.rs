//! Timer state machine
//!
//! `reduce` is the only way a [`TimerState`] changes. User stop and natural
//! completion are separate transitions: a stop forgets the task, completion
//! keeps it so callers can tell which session just ended.

use chrono::{DateTime, Utc};

use crate::state::{Phase, TimerState};

/// Input to [`reduce`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Begin a countdown, replacing whatever the timer was doing
    Start {
        task_id: Option<String>,
        duration: u64,
        now: DateTime<Utc>,
    },
    /// Cancelled by the user
    UserStop { default_duration: u64 },
    /// One second elapsed
    Tick { default_duration: u64 },
    /// Replace the state wholesale (mount-time restoration)
    Restore(TimerState),
}

/// Compute the next state
pub fn reduce(state: &TimerState, action: Action) -> TimerState {
    match action {
        Action::Start {
            task_id,
            duration,
            now,
        } => TimerState {
            active_task_id: task_id,
            phase: Phase::Running,
            remaining_seconds: duration,
            start_timestamp: Some(now),
        },
        Action::UserStop { default_duration } => user_stop(default_duration),
        Action::Tick { default_duration } => tick(state, default_duration),
        Action::Restore(restored) => restored,
    }
}

/// State after the user cancels a session
pub fn user_stop(default_duration: u64) -> TimerState {
    TimerState::idle(default_duration)
}

/// State after a countdown reaches zero on its own
pub fn complete(state: &TimerState, default_duration: u64) -> TimerState {
    TimerState {
        active_task_id: state.active_task_id.clone(),
        phase: Phase::Completed,
        remaining_seconds: default_duration,
        start_timestamp: None,
    }
}

fn tick(state: &TimerState, default_duration: u64) -> TimerState {
    if !state.is_running() {
        return state.clone();
    }

    if state.remaining_seconds <= 1 {
        complete(state, default_duration)
    } else {
        TimerState {
            remaining_seconds: state.remaining_seconds - 1,
            ..state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn running(task: &str, remaining: u64) -> TimerState {
        TimerState {
            active_task_id: Some(task.to_string()),
            phase: Phase::Running,
            remaining_seconds: remaining,
            start_timestamp: Some(now()),
        }
    }

    #[test]
    fn test_start_from_idle() {
        let next = reduce(
            &TimerState::idle(1500),
            Action::Start {
                task_id: Some("task-1".to_string()),
                duration: 1500,
                now: now(),
            },
        );
        assert_eq!(next, running("task-1", 1500));
    }

    #[test]
    fn test_start_overwrites_running_timer() {
        let next = reduce(
            &running("task-1", 42),
            Action::Start {
                task_id: Some("task-2".to_string()),
                duration: 600,
                now: now(),
            },
        );
        assert_eq!(next.active_task_id.as_deref(), Some("task-2"));
        assert_eq!(next.remaining_seconds, 600);
    }

    #[test]
    fn test_user_stop_clears_task_and_is_idempotent() {
        let once = reduce(&running("task-1", 42), Action::UserStop { default_duration: 1500 });
        let twice = reduce(&once, Action::UserStop { default_duration: 1500 });

        assert_eq!(once, TimerState::idle(1500));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tick_decrements() {
        let next = reduce(&running("task-1", 10), Action::Tick { default_duration: 1500 });
        assert_eq!(next.remaining_seconds, 9);
        assert_eq!(next.phase, Phase::Running);
        assert_eq!(next.start_timestamp, Some(now()));
    }

    #[test]
    fn test_last_tick_completes_and_keeps_task() {
        let next = reduce(&running("task-1", 1), Action::Tick { default_duration: 1500 });
        assert_eq!(next.phase, Phase::Completed);
        assert_eq!(next.remaining_seconds, 1500);
        assert_eq!(next.active_task_id.as_deref(), Some("task-1"));
        assert_eq!(next.start_timestamp, None);
    }

    #[test]
    fn test_tick_on_zero_duration_completes() {
        let next = reduce(&running("task-1", 0), Action::Tick { default_duration: 300 });
        assert!(next.is_completed());
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let idle = TimerState::idle(1500);
        assert_eq!(reduce(&idle, Action::Tick { default_duration: 1500 }), idle);

        let done = complete(&running("task-1", 1), 1500);
        assert_eq!(reduce(&done, Action::Tick { default_duration: 1500 }), done);
    }

    #[test]
    fn test_restore_is_verbatim() {
        let snapshot = running("task-9", 77);
        assert_eq!(
            reduce(&TimerState::idle(1500), Action::Restore(snapshot.clone())),
            snapshot
        );
    }

    #[test]
    fn test_full_session_of_ticks() {
        let mut state = reduce(
            &TimerState::idle(1500),
            Action::Start {
                task_id: Some("task-1".to_string()),
                duration: 1500,
                now: now(),
            },
        );
        for _ in 0..1499 {
            state = reduce(&state, Action::Tick { default_duration: 1500 });
            assert!(state.is_running());
        }
        state = reduce(&state, Action::Tick { default_duration: 1500 });

        assert_eq!(state.phase, Phase::Completed);
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.active_task_id.as_deref(), Some("task-1"));
    }
}
