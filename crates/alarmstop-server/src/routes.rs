//! HTTP trigger surface.
//!
//! - `GET /stop` runs the stop-alarm workflow
//! - `GET /health` reports the session state without exposing tokens

use std::sync::Arc;

use alarmstop_core::{AlarmController, AlarmError, SessionStatus, StopOutcome};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

pub fn router(controller: Arc<AlarmController>) -> Router {
    Router::new()
        .route("/stop", get(stop))
        .route("/health", get(health))
        .with_state(controller)
}

/// Workflow failure, reported to the caller as 502 with its category
struct TriggerError(AlarmError);

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

async fn stop(
    State(controller): State<Arc<AlarmController>>,
) -> Result<Json<StopOutcome>, TriggerError> {
    match controller.stop_active_alarm_if_any().await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Stop request failed");
            Err(TriggerError(e))
        }
    }
}

async fn health(State(controller): State<Arc<AlarmController>>) -> Json<SessionStatus> {
    Json(controller.sessions().status())
}
