//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod preferences;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use preferences::{Preferences, PreferencesUpdate, TimerPreferences};
pub use timer_state::{Phase, TimerKind, TimerSnapshot, TimerState};
