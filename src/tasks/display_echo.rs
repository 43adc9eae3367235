//! Display echo background task

use tokio::sync::watch;
use tracing::info;

use crate::display::DisplayFrame;

/// Background task that logs each change of the status line, so a headless
/// server still shows what a screen would
pub async fn display_echo_task(mut frames: watch::Receiver<DisplayFrame>) {
    let mut last_status = frames.borrow().status_text.clone();

    while frames.changed().await.is_ok() {
        let frame = frames.borrow_and_update().clone();
        if frame.status_text != last_status {
            info!("[{}] {}", frame.time_text, frame.status_text);
            last_status = frame.status_text;
        }
    }
}
