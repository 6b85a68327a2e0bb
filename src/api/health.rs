use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

// GET /health: liveness plus a summary of what the backend serves.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "networks": state.registry.keys().len(),
        "default_network": state.config.default_network,
    }))
}
