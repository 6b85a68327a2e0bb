// src/api/faucet.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::warn;

use crate::api::request_error_response;
use crate::blockchain::{
    models::BalanceError,
    services::faucet::{FaucetError, FaucetOutcome},
};
use crate::AppState;

#[derive(Deserialize)]
pub struct FaucetRequest {
    pub network: String,
    pub address: String,
}

/// Axum handler for the faucet request endpoint.
pub async fn request_faucet(
    State(state): State<AppState>,
    Json(req): Json<FaucetRequest>,
) -> Result<Json<FaucetOutcome>, (StatusCode, String)> {
    let network = req.network.trim();

    let outcome = state
        .faucet_service
        .request_funds(network, req.address.trim())
        .await
        .map_err(|e| {
            warn!("Faucet request for {} on {} failed: {}", req.address, network, e);
            match &e {
                FaucetError::Request(inner) => request_error_response(inner),
                FaucetError::Unavailable(_) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
                FaucetError::MainnetBlocked(_) => (StatusCode::FORBIDDEN, e.to_string()),
                FaucetError::Failed(BalanceError::EndpointTimeout { .. }) => {
                    (StatusCode::GATEWAY_TIMEOUT, e.to_string())
                }
                FaucetError::Failed(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
            }
        })?;

    Ok(Json(outcome))
}
