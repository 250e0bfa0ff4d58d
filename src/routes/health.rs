use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Liveness plus a store round-trip; 503 when the store cannot be reached.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.count().await {
        Ok(webhooks) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "webhooks": webhooks })),
        ),
        Err(e) => {
            tracing::warn!(error = ?e, "health check could not reach the store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.to_string() })),
            )
        }
    }
}
