//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{TimerKind, TimerPreferences, TimerState},
    timer::{format, is_completed},
};

/// Body of `POST /timers/:kind/start`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Read-only view of one timer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub kind: TimerKind,
    pub active_task_id: Option<String>,
    pub phase: String,
    pub remaining_seconds: u64,
    /// `remaining_seconds` as `MM:SS`
    pub display: String,
}

impl TimerView {
    pub fn new(kind: TimerKind, state: &TimerState) -> Self {
        Self {
            kind,
            active_task_id: state.active_task_id.clone(),
            phase: kind.phase_label(state.phase).to_string(),
            remaining_seconds: state.remaining_seconds,
            display: format(i64::try_from(state.remaining_seconds).unwrap_or(i64::MAX)),
        }
    }
}

/// Query of `GET /format`
#[derive(Debug, Clone, Deserialize)]
pub struct FormatQuery {
    pub seconds: i64,
}

/// Response of `GET /format`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatResponse {
    pub seconds: i64,
    pub display: String,
    pub completed: bool,
}

impl FormatResponse {
    pub fn new(seconds: i64) -> Self {
        Self {
            seconds,
            display: format(seconds),
            completed: is_completed(seconds),
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Status response with both timers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timers: Vec<TimerView>,
    pub preferences: TimerPreferences,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
