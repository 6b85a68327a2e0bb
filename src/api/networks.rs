use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::request_error_response;
use crate::blockchain::{models::NetworkDescriptor, services::overrides::OverrideError};
use crate::AppState;

/// A network as the UI sees it: static descriptor plus the endpoints a
/// lookup would actually use right now.
#[derive(Debug, Serialize)]
pub struct NetworkView {
    #[serde(flatten)]
    pub descriptor: NetworkDescriptor,
    pub display_id: String,
    pub effective_rpc_urls: Vec<String>,
    pub custom_rpc: bool,
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetRpcRequest {
    pub url: String,
}

async fn network_view(state: &AppState, descriptor: &NetworkDescriptor) -> NetworkView {
    let endpoints = state.overrides.endpoints_for(descriptor).await;
    NetworkView {
        display_id: descriptor.display_id(),
        effective_rpc_urls: endpoints.urls,
        custom_rpc: endpoints.custom,
        is_default: descriptor.key == state.config.default_network,
        descriptor: descriptor.clone(),
    }
}

fn override_error_response(err: OverrideError) -> (StatusCode, String) {
    match err {
        OverrideError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        other => {
            error!("RPC override storage failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

// GET /networks
pub async fn list_networks_handler(State(state): State<AppState>) -> Json<Vec<NetworkView>> {
    let mut views = Vec::new();
    for descriptor in state.registry.iter() {
        views.push(network_view(&state, descriptor).await);
    }
    Json(views)
}

// PUT /networks/{network}/rpc
pub async fn set_rpc_override_handler(
    Path(network): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<SetRpcRequest>,
) -> Result<Json<NetworkView>, (StatusCode, String)> {
    let descriptor = state
        .registry
        .get(&network)
        .map_err(|e| request_error_response(&e))?;

    state
        .overrides
        .set(&descriptor.key, &req.url)
        .await
        .map_err(override_error_response)?;

    Ok(Json(network_view(&state, descriptor).await))
}

// DELETE /networks/{network}/rpc
pub async fn clear_rpc_override_handler(
    Path(network): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    let descriptor = state
        .registry
        .get(&network)
        .map_err(|e| request_error_response(&e))?;

    state
        .overrides
        .clear(&descriptor.key)
        .await
        .map_err(override_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}
