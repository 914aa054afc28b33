use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::app::AppState;
use crate::app::errors::json_error;

pub async fn health(State(state): State<AppState>) -> Response {
    match state.services.db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            warn!(error = %e, "health check failed");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
        }
    }
}
