//! # API Module
//!
//! HTTP handlers for the wallet backend. The UI collaborator talks to these
//! endpoints; all wording shown to users is its responsibility.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /networks` - Configured networks with their effective endpoints
//! - `PUT /networks/:network/rpc` - Set a custom RPC endpoint for a network
//! - `DELETE /networks/:network/rpc` - Remove the custom RPC endpoint
//! - `GET /balance/:network/:address` - Native balance with diagnostics
//! - `GET /balance/:network/:address/stream` - Periodic balance updates (SSE)
//! - `POST /faucet` - Request testnet funds

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Router,
};

use crate::blockchain::models::RequestError;
use crate::AppState;

pub mod balance;
pub mod faucet;
pub mod health;
pub mod networks;

/// Routes of the wallet API, ready to be nested under a prefix.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/networks", get(networks::list_networks_handler))
        .route(
            "/networks/:network/rpc",
            put(networks::set_rpc_override_handler).delete(networks::clear_rpc_override_handler),
        )
        .route("/balance/:network/:address", get(balance::get_balance_handler))
        .route(
            "/balance/:network/:address/stream",
            get(balance::balance_stream_handler),
        )
        .route("/faucet", post(faucet::request_faucet))
}

pub(crate) fn request_error_response(err: &RequestError) -> (StatusCode, String) {
    let status = match err {
        RequestError::UnknownNetwork(_) => StatusCode::NOT_FOUND,
        RequestError::InvalidAccount { .. } => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}
