//! MindEase - focus and break timers for a cognitive-accessibility task manager
//!
//! This library provides the timer engine (a countdown state machine with
//! snapshot persistence and wall-clock restoration) and the HTTP surface
//! that serves it.

pub mod config;
pub mod state;
pub mod api;
pub mod storage;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use timer::{format, TimerController};
pub use utils::signals::shutdown_signal;
