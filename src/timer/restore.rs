//! Rehydration of a persisted timer

use chrono::{DateTime, Utc};

use super::{
    duration::remaining_from,
    format::is_completed,
    reducer::complete,
};
use crate::state::TimerState;

/// Reconcile a persisted state with the time that passed while nothing was
/// ticking it.
///
/// A running snapshot's `remaining_seconds` is taken as valid at its
/// `start_timestamp`. The result is either still running, re-anchored at
/// `now`, or completed with the task kept. Anything else comes back as-is.
pub fn restore(snapshot: TimerState, default_duration: u64, now: DateTime<Utc>) -> TimerState {
    let start = match snapshot.start_timestamp {
        Some(start) if snapshot.is_running() => start,
        _ => return snapshot,
    };

    let initial = i64::try_from(snapshot.remaining_seconds).unwrap_or(i64::MAX);
    let remaining = remaining_from(start, initial, now);

    if is_completed(remaining) {
        return complete(&snapshot, default_duration);
    }

    TimerState {
        remaining_seconds: remaining as u64,
        start_timestamp: Some(now),
        ..snapshot
    }
}
