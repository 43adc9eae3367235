//! State management module
//!
//! The countdown state machine and the shared application state around it.

pub mod timer_state;
pub mod engine;
pub mod app_state;

// Re-export main types
pub use timer_state::{TimerPhase, TimerSnapshot, TimerState};
pub use engine::{TimerEngine, TICK_PERIOD};
pub use app_state::AppState;
