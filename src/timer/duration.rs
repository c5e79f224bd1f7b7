//! Wall-clock reconciliation of a countdown

use chrono::{DateTime, Utc};

/// Seconds left on a countdown of `initial_duration` seconds that was
/// anchored at `start`, as seen at `now`. Never negative.
pub fn remaining_from(start: DateTime<Utc>, initial_duration: i64, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - start).num_milliseconds().div_euclid(1000);
    initial_duration.saturating_sub(elapsed).max(0)
}

/// [`remaining_from`] against the system clock
pub fn remaining_from_now(start: DateTime<Utc>, initial_duration: i64) -> i64 {
    remaining_from(start, initial_duration, Utc::now())
}
