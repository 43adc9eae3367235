//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    display::{DisplayFrame, WatchDisplay},
    services::SoundCues,
    tasks::ticker::{LoopId, Ticker},
    utils::Clock,
};
use super::{TimerEngine, TimerSnapshot};

/// Main application state that owns the countdown engine
pub struct AppState {
    /// The countdown engine; every mutation happens under this lock
    pub engine: Arc<Mutex<TimerEngine>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest frame rendered by the engine
    pub display_rx: watch::Receiver<DisplayFrame>,
}

impl AppState {
    /// Create a new AppState around a fresh engine
    pub fn new(
        port: u16,
        host: String,
        duration_ms: u64,
        clock: Arc<dyn Clock>,
        ticker: Box<dyn Ticker>,
        cues: SoundCues,
    ) -> Self {
        let (display, display_rx) = WatchDisplay::channel();
        let engine = TimerEngine::new(duration_ms, clock, ticker, cues, Box::new(display));

        Self {
            engine: Arc::new(Mutex::new(engine)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            display_rx,
        }
    }

    /// Run a user action against the engine and record it as the last action
    pub fn apply<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        updater(&mut *engine);
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    pub fn toggle(&self) -> Result<TimerSnapshot, String> {
        info!("Toggling timer");
        self.apply("toggle", TimerEngine::toggle)
    }

    pub fn start(&self) -> Result<TimerSnapshot, String> {
        info!("Starting timer");
        self.apply("start", TimerEngine::start)
    }

    /// Pause if running; pausing an idle timer leaves it untouched
    pub fn pause(&self) -> Result<TimerSnapshot, String> {
        info!("Pausing timer");
        self.apply("pause", |engine| {
            if engine.is_running() {
                engine.pause();
            }
        })
    }

    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        info!("Resetting timer");
        self.apply("reset", TimerEngine::reset)
    }

    pub fn adjust(&self, delta_seconds: i64) -> Result<TimerSnapshot, String> {
        info!("Adjusting timer by {}s", delta_seconds);
        self.apply(&format!("adjust {:+}", delta_seconds), |engine| {
            engine.adjust(delta_seconds)
        })
    }

    pub fn preset(&self, seconds: i64) -> Result<TimerSnapshot, String> {
        info!("Presetting timer to {}s", seconds);
        self.apply(&format!("preset {}", seconds), |engine| engine.preset(seconds))
    }

    /// Deliver a tick from the given loop. Not recorded as a user action.
    pub fn tick(&self, loop_id: LoopId) -> Result<(), String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        engine.tick_from(loop_id);
        Ok(())
    }

    /// Get the current timer snapshot
    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Latest frame published to the rendering surface
    pub fn get_display(&self) -> DisplayFrame {
        self.display_rx.borrow().clone()
    }

    /// Stop the tick loop and any playing cue
    pub fn shutdown(&self) {
        match self.engine.lock() {
            Ok(mut engine) => {
                engine.shutdown();
                info!("Timer engine shut down");
            }
            Err(e) => warn!("Failed to lock timer engine for shutdown: {}", e),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
