//! User timer preferences

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TimerKind;

pub const DEFAULT_FOCUS_MINUTES: u64 = 25;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;

/// Accepted range for either duration, in minutes
pub const MINUTES_RANGE: std::ops::RangeInclusive<u64> = 1..=240;

/// Durations the timers fall back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPreferences {
    pub focus_duration_minutes: u64,
    pub break_duration_minutes: u64,
}

impl Default for TimerPreferences {
    fn default() -> Self {
        Self {
            focus_duration_minutes: DEFAULT_FOCUS_MINUTES,
            break_duration_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl TimerPreferences {
    /// Configured default duration for `kind`, in seconds
    pub fn duration_seconds(&self, kind: TimerKind) -> u64 {
        let minutes = match kind {
            TimerKind::Focus => self.focus_duration_minutes,
            TimerKind::Break => self.break_duration_minutes,
        };
        minutes * 60
    }
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub focus_duration_minutes: Option<u64>,
    pub break_duration_minutes: Option<u64>,
}

/// Shared, mutable preferences read by both timer controllers
#[derive(Debug, Default)]
pub struct Preferences {
    current: Mutex<TimerPreferences>,
}

impl Preferences {
    pub fn new(initial: TimerPreferences) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Get a copy of the current preferences
    pub fn get(&self) -> TimerPreferences {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configured default duration for `kind`, in seconds
    pub fn duration_seconds(&self, kind: TimerKind) -> u64 {
        self.get().duration_seconds(kind)
    }

    /// Apply an update after validating every supplied field
    pub fn update(&self, update: PreferencesUpdate) -> Result<TimerPreferences, String> {
        for (name, value) in [
            ("focusDurationMinutes", update.focus_duration_minutes),
            ("breakDurationMinutes", update.break_duration_minutes),
        ] {
            if let Some(minutes) = value {
                if !MINUTES_RANGE.contains(&minutes) {
                    return Err(format!(
                        "{} must be between {} and {} minutes, got {}",
                        name,
                        MINUTES_RANGE.start(),
                        MINUTES_RANGE.end(),
                        minutes
                    ));
                }
            }
        }

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(minutes) = update.focus_duration_minutes {
            current.focus_duration_minutes = minutes;
        }
        if let Some(minutes) = update.break_duration_minutes {
            current.break_duration_minutes = minutes;
        }

        info!(
            "Timer preferences updated: focus={}min, break={}min",
            current.focus_duration_minutes, current.break_duration_minutes
        );
        Ok(*current)
    }
}
