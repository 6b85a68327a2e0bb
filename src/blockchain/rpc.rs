// src/blockchain/rpc.rs
//
// JSON-RPC 2.0 over HTTP, shared by the EVM and Solana clients so both chain
// families go through the same `reqwest::Client` and its transport settings.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::models::{BalanceError, EndpointCandidate};

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Clone, Debug)]
pub struct JsonRpcTransport {
    http: Client,
}

impl JsonRpcTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Sends one request to `endpoint`. Transport failures, non-2xx statuses,
    /// RPC error objects and missing results all map to `ConnectionFailure`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &EndpointCandidate,
        method: &str,
        params: Value,
    ) -> Result<T, BalanceError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http
            .post(endpoint.url())
            .json(&request)
            .send()
            .await
            .map_err(|e| BalanceError::ConnectionFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BalanceError::ConnectionFailure(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| BalanceError::ConnectionFailure(format!("invalid {} response: {}", method, e)))?;

        if let Some(error) = body.error {
            return Err(BalanceError::ConnectionFailure(format!(
                "rpc error {}: {}",
                error.code, error.message
            )));
        }

        match body.result {
            Some(result) => Ok(result),
            // `null` results (e.g. `hardhat_setBalance`) only satisfy types that accept null
            None => serde_json::from_value(Value::Null)
                .map_err(|_| BalanceError::ConnectionFailure(format!("{} response missing 'result'", method))),
        }
    }
}
