//! Timer state structure and its persisted snapshot

use std::fmt;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for a persisted `remainingSeconds` (one week)
pub const MAX_REMAINING_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Which of the two process-wide timers a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Focus,
    Break,
}

impl TimerKind {
    pub const ALL: [TimerKind; 2] = [TimerKind::Focus, TimerKind::Break];

    /// Storage key holding this timer's snapshot
    pub fn storage_key(self) -> &'static str {
        match self {
            TimerKind::Focus => "mindease.focusTimer",
            TimerKind::Break => "mindease.breakTimer",
        }
    }

    /// Wire label for a phase. The break timer calls completion `breakEnded`.
    pub fn phase_label(self, phase: Phase) -> &'static str {
        match (self, phase) {
            (_, Phase::Idle) => "idle",
            (_, Phase::Running) => "running",
            (TimerKind::Focus, Phase::Completed) => "completed",
            (TimerKind::Break, Phase::Completed) => "breakEnded",
        }
    }

    /// Inverse of [`TimerKind::phase_label`]
    pub fn parse_phase(self, label: &str) -> Option<Phase> {
        match (self, label) {
            (_, "idle") => Some(Phase::Idle),
            (_, "running") => Some(Phase::Running),
            (TimerKind::Focus, "completed") => Some(Phase::Completed),
            (TimerKind::Break, "breakEnded") => Some(Phase::Completed),
            _ => None,
        }
    }

    /// Whether an idle state that still names a task should stay persisted.
    ///
    /// Only the focus timer does this, so a restart between completion and the
    /// caller reacting to it keeps the "task X finished" signal.
    pub fn persists_idle_with_task(self) -> bool {
        matches!(self, TimerKind::Focus)
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Focus => write!(f, "focus"),
            TimerKind::Break => write!(f, "break"),
        }
    }
}

/// Countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completed,
}

/// In-memory state of one timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Task associated with the current session. Kept on natural completion,
    /// cleared on user stop.
    pub active_task_id: Option<String>,
    pub phase: Phase,
    pub remaining_seconds: u64,
    /// Set whenever `phase` is `Running`
    pub start_timestamp: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an idle timer state with the given default duration
    pub fn idle(default_seconds: u64) -> Self {
        Self {
            active_task_id: None,
            phase: Phase::Idle,
            remaining_seconds: default_seconds,
            start_timestamp: None,
        }
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Check if the timer finished on its own and has not been reset yet
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// JSON shape written to the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub active_task_id: Option<String>,
    pub phase: String,
    pub remaining_seconds: u64,
    pub start_timestamp: Option<DateTime<Utc>>,
}

impl TimerSnapshot {
    /// Snapshot a state, labelling its phase for `kind`
    pub fn from_state(kind: TimerKind, state: &TimerState) -> Self {
        Self {
            active_task_id: state.active_task_id.clone(),
            phase: kind.phase_label(state.phase).to_string(),
            remaining_seconds: state.remaining_seconds,
            start_timestamp: state.start_timestamp,
        }
    }

    /// Decode back into a state; fails on a phase label unknown to `kind` or
    /// a remaining time no countdown could have
    pub fn into_state(self, kind: TimerKind) -> Result<TimerState> {
        let phase = kind
            .parse_phase(&self.phase)
            .ok_or_else(|| anyhow!("unknown {} timer phase '{}'", kind, self.phase))?;

        if self.remaining_seconds > MAX_REMAINING_SECONDS {
            bail!(
                "{} timer remaining {}s is out of range",
                kind,
                self.remaining_seconds
            );
        }

        Ok(TimerState {
            active_task_id: self.active_task_id,
            phase,
            remaining_seconds: self.remaining_seconds,
            start_timestamp: self.start_timestamp,
        })
    }
}
