//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    display::DisplayFrame,
    state::{AppState, TimerSnapshot},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Wrap the outcome of a timer action in a JSON response
fn respond(
    action: &str,
    message: String,
    result: Result<TimerSnapshot, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - timer is {}", action, timer.phase.as_str());
            Ok(Json(ApiResponse::new(message, timer)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - Start or pause depending on the current state
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.toggle();
    let message = match &result {
        Ok(timer) if timer.running => "Timer started",
        _ => "Timer paused",
    };
    respond("toggle", message.to_string(), result)
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("start", "Timer started".to_string(), state.start())
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", "Timer paused".to_string(), state.pause())
}

/// Handle POST /reset - Stop and restore the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("reset", "Timer reset".to_string(), state.reset())
}

/// Handle POST /adjust/:seconds - Nudge the duration by a signed number of seconds
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Path(seconds): Path<i64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(
        "adjust",
        format!("Timer adjusted by {:+}s", seconds),
        state.adjust(seconds),
    )
}

/// Handle POST /preset/:seconds - Replace the duration
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(seconds): Path<i64>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(
        "preset",
        format!("Timer preset to {}s", seconds.max(0)),
        state.preset(seconds),
    )
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /display - Latest rendered frame
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Json<DisplayFrame> {
    Json(state.get_display())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
