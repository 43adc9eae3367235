//! Sacred Timer - A state-managed HTTP countdown timer
//!
//! This is the main entry point for the sacred-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use sacred_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{display_echo_task, tick_pump_task, IntervalTicker},
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sacred_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sacred-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, mute={}",
          config.host, config.port, config.duration, config.mute);

    // Tick loops report to the pump through this channel
    let (ticker, ticks) = IntervalTicker::channel();

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.initial_duration_ms(),
        Arc::new(SystemClock),
        Box::new(ticker),
        config.sound_cues(),
    ));

    // Start the background tasks
    tokio::spawn(tick_pump_task(Arc::clone(&state), ticks));
    tokio::spawn(display_echo_task(state.display_rx.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle          - Start or pause the countdown");
    info!("  POST /start           - Start or resume the countdown");
    info!("  POST /pause           - Pause the countdown");
    info!("  POST /reset           - Restore the configured duration");
    info!("  POST /adjust/:seconds - Nudge the duration by signed seconds");
    info!("  POST /preset/:seconds - Set the duration in seconds");
    info!("  GET  /status          - Timer status, uptime and last action");
    info!("  GET  /display         - Latest rendered frame");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
