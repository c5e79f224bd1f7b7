//! Focus and break timer engine
//!
//! Leaf helpers (`format`, `duration`), the pure state machine (`reducer`,
//! `restore`) and the [`TimerController`] that wires them to storage.

pub mod clock;
pub mod controller;
pub mod duration;
pub mod format;
pub mod reducer;
pub mod restore;

pub use clock::{Clock, SystemClock};
pub use controller::TimerController;
pub use duration::{remaining_from, remaining_from_now};
pub use format::{format, is_completed};
pub use reducer::{reduce, Action};
pub use restore::restore;
