use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tracing::{error, warn};

use crate::api::request_error_response;
use crate::blockchain::{models::BalanceReport, services::refresh::spawn_refresh};
use crate::AppState;

// Defines the structure for the network and address extracted from the URL path.
#[derive(Debug, Deserialize)]
pub struct BalancePath {
    pub network: String,
    pub address: String,
}

// The handler function for the GET /balance/{network}/{address} endpoint.
// Endpoint failures are reported inside the body with status 200; only
// malformed requests are rejected.
pub async fn get_balance_handler(
    Path(path): Path<BalancePath>,
    State(state): State<AppState>,
) -> Result<Json<BalanceReport>, (StatusCode, String)> {
    let report = state
        .balance_service
        .fetch_balance(&path.network, &path.address)
        .await
        .map_err(|e| {
            error!("Failed to get balance for {}: {}", path.address, e);
            request_error_response(&e)
        })?;

    if let Some(err) = &report.error {
        warn!("Balance for {} on {} unavailable: {}", path.address, path.network, err);
    }

    Ok(Json(report))
}

// GET /balance/{network}/{address}/stream: one `balance` event per refresh.
pub async fn balance_stream_handler(
    Path(path): Path<BalancePath>,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    state
        .balance_service
        .check_request(&path.network, &path.address)
        .map_err(|e| request_error_response(&e))?;

    let (rx, _refresh) = spawn_refresh(
        state.balance_service.clone(),
        path.network,
        path.address,
        state.config.refresh_interval,
    );

    let events = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let event = match rx.borrow_and_update().as_ref() {
            Some(report) => Event::default()
                .event("balance")
                .json_data(report)
                .unwrap_or_else(|e| Event::default().comment(format!("encode failed: {}", e))),
            None => Event::default().comment("pending"),
        };
        Some((Ok(event), rx))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
