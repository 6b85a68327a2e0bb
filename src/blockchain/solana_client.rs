// src/blockchain/solana_client.rs

use async_trait::async_trait;
use ethers::types::U256;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::blockchain::{
    client::RpcClient,
    models::{BalanceError, ChainIdentity, EndpointCandidate},
    rpc::JsonRpcTransport,
};

#[derive(Debug, Deserialize)]
struct BalanceValue {
    value: u64,
}

/// Client for Solana JSON-RPC nodes.
#[derive(Clone, Debug)]
pub struct SolanaClient {
    rpc: JsonRpcTransport,
}

impl SolanaClient {
    pub fn new(http: Client) -> Self {
        Self {
            rpc: JsonRpcTransport::new(http),
        }
    }
}

#[async_trait]
impl RpcClient for SolanaClient {
    async fn chain_identity(&self, endpoint: &EndpointCandidate) -> Result<ChainIdentity, BalanceError> {
        let genesis_hash: String = self.rpc.call(endpoint, "getGenesisHash", json!([])).await?;
        debug!("{} reports genesis {}", endpoint.label(), genesis_hash);
        Ok(ChainIdentity::Solana { genesis_hash })
    }

    async fn balance(&self, endpoint: &EndpointCandidate, account: &str) -> Result<U256, BalanceError> {
        let balance: BalanceValue = self
            .rpc
            .call(endpoint, "getBalance", json!([account, { "commitment": "confirmed" }]))
            .await?;
        Ok(U256::from(balance.value))
    }

    async fn request_funds(
        &self,
        endpoint: &EndpointCandidate,
        account: &str,
        amount: U256,
    ) -> Result<Option<String>, BalanceError> {
        if amount > U256::from(u64::MAX) {
            return Err(BalanceError::ConnectionFailure(format!(
                "airdrop amount {} exceeds u64 lamports",
                amount
            )));
        }
        let signature: String = self
            .rpc
            .call(endpoint, "requestAirdrop", json!([account, amount.as_u64()]))
            .await?;
        Ok(Some(signature))
    }
}
