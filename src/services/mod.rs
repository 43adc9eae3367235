//! External resources module
//!
//! Sound cues played through an external audio player.

pub mod cues;

// Re-export main types
pub use cues::{CommandCue, SilentCue, SoundCue, SoundCues};
