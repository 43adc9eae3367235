//! Rendering surfaces the engine writes frames into

use tokio::sync::watch;
use tracing::{debug, warn};

use super::DisplayFrame;

/// Receives every frame the engine renders
pub trait DisplaySink: Send {
    fn render(&mut self, frame: &DisplayFrame);
}

/// Publishes frames on a watch channel so the API and background tasks can
/// observe the latest one
#[derive(Debug)]
pub struct WatchDisplay {
    tx: watch::Sender<DisplayFrame>,
}

impl WatchDisplay {
    pub fn new(tx: watch::Sender<DisplayFrame>) -> Self {
        Self { tx }
    }

    /// Create a display together with a receiver for its frames
    pub fn channel() -> (Self, watch::Receiver<DisplayFrame>) {
        let (tx, rx) = watch::channel(DisplayFrame::default());
        (Self::new(tx), rx)
    }
}

impl DisplaySink for WatchDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        debug!("Render {} | {}", frame.time_text, frame.status_text);
        if let Err(e) = self.tx.send(frame.clone()) {
            warn!("Failed to publish display frame: {}", e);
        }
    }
}
