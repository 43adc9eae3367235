//! Display module
//!
//! Turns timer state into the readout, status line and progress ring.

pub mod frame;
pub mod sink;

pub use frame::{format_time, ring_fraction, DisplayFrame, RingGeometry};
pub use sink::{DisplaySink, WatchDisplay};
