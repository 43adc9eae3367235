//! Sacred Timer - A state-managed HTTP countdown timer
//!
//! This library provides a countdown engine that renders a time readout and
//! a progress ring, plays sound cues near the end and at completion, and is
//! driven through a small HTTP API.

pub mod config;
pub mod display;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine};
pub use api::create_router;
pub use utils::shutdown_signal;
