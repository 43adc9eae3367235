//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::services::SoundCues;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "sacred-timer")]
#[command(about = "A state-managed HTTP countdown timer with a progress ring and audio cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial countdown duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Sound played when one minute remains
    #[arg(long, default_value = "audio/smb_warning.mp3")]
    pub warning_cue: PathBuf,

    /// Sound played when the countdown ends
    #[arg(long, default_value = "audio/smb_mariodie.mp3")]
    pub completion_cue: PathBuf,

    /// Command used to play sound files
    #[arg(long, default_value = "mpg123")]
    pub player: String,

    /// Disable both sound cues
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn initial_duration_ms(&self) -> u64 {
        self.duration.saturating_mul(1000)
    }

    /// Build the sound cues described by the configuration
    pub fn sound_cues(&self) -> SoundCues {
        if self.mute {
            SoundCues::silent()
        } else {
            SoundCues::command(&self.player, &self.warning_cue, &self.completion_cue)
        }
    }
}
