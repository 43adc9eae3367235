//! Utility functions module
//!
//! Clock sources and signal handling used throughout the application.

pub mod clock;
pub mod signals;

// Re-export main items
pub use clock::{Clock, ManualClock, SystemClock};
pub use signals::shutdown_signal;
