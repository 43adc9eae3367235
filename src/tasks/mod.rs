//! Background tasks module
//!
//! Tick loops and the tasks that run alongside the HTTP server.

pub mod ticker;
pub mod tick_pump;
pub mod display_echo;

// Re-export main items
pub use ticker::{IntervalTicker, LoopId, ManualTicker, TickHandle, Ticker};
pub use tick_pump::tick_pump_task;
pub use display_echo::display_echo_task;
