// src/blockchain/evm_client.rs

use async_trait::async_trait;
use ethers::types::{Address, U256, U64};
use reqwest::Client;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::debug;

use crate::blockchain::{
    client::RpcClient,
    models::{BalanceError, ChainIdentity, EndpointCandidate},
    rpc::JsonRpcTransport,
};

/// Client for EVM-compatible nodes. Requests go through the shared HTTP
/// client; quantities are decoded with the `ethers` hex types.
#[derive(Clone, Debug)]
pub struct EvmClient {
    rpc: JsonRpcTransport,
}

impl EvmClient {
    pub fn new(http: Client) -> Self {
        Self {
            rpc: JsonRpcTransport::new(http),
        }
    }

    fn parse_address(account: &str) -> Result<Address, BalanceError> {
        Address::from_str(account).map_err(|e| BalanceError::InvalidAccount(format!("{}: {}", account, e)))
    }
}

#[async_trait]
impl RpcClient for EvmClient {
    async fn chain_identity(&self, endpoint: &EndpointCandidate) -> Result<ChainIdentity, BalanceError> {
        let chain_id: U64 = self.rpc.call(endpoint, "eth_chainId", json!([])).await?;
        debug!("{} reports chain id {}", endpoint.label(), chain_id);
        Ok(ChainIdentity::Evm {
            chain_id: chain_id.as_u64(),
        })
    }

    async fn balance(&self, endpoint: &EndpointCandidate, account: &str) -> Result<U256, BalanceError> {
        let address = Self::parse_address(account)?;
        self.rpc
            .call(endpoint, "eth_getBalance", json!([address, "latest"]))
            .await
    }

    /// Dev-node funding through `hardhat_setBalance` (also understood by
    /// Anvil). Sets the balance rather than adding to it.
    async fn request_funds(
        &self,
        endpoint: &EndpointCandidate,
        account: &str,
        amount: U256,
    ) -> Result<Option<String>, BalanceError> {
        let address = Self::parse_address(account)?;
        let _: Value = self
            .rpc
            .call(
                endpoint,
                "hardhat_setBalance",
                json!([address, format!("0x{:x}", amount)]),
            )
            .await?;
        Ok(None)
    }
}
