//! Tick pump background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{state::AppState, tasks::ticker::LoopId};

/// Background task that delivers ticks from the active tick loop to the engine
pub async fn tick_pump_task(state: Arc<AppState>, mut ticks: mpsc::UnboundedReceiver<LoopId>) {
    info!("Starting tick pump task");

    while let Some(loop_id) = ticks.recv().await {
        if let Err(e) = state.tick(loop_id) {
            error!("Failed to deliver tick: {}", e);
        }
    }

    info!("Tick channel closed, tick pump stopping");
}
