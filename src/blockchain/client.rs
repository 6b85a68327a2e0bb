//! Blockchain client module.
//!
//! `RpcClient` is the seam between the resolver and the chains it queries.
//! The live implementations share one `reqwest` client for EVM and Solana
//! JSON-RPC; tests plug in scripted clients instead.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::U256;

pub use super::evm_client::EvmClient;
pub use super::solana_client::SolanaClient;
use crate::blockchain::models::{BalanceError, ChainIdentity, ChainType, EndpointCandidate};

/// RPC operations the wallet needs from a chain node.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Asks the node which chain it serves.
    async fn chain_identity(&self, endpoint: &EndpointCandidate) -> Result<ChainIdentity, BalanceError>;

    /// Native balance of `account` in base units (wei, lamports).
    async fn balance(&self, endpoint: &EndpointCandidate, account: &str) -> Result<U256, BalanceError>;

    /// Mints test funds to `account`. Returns the transaction signature when
    /// the node produces one.
    async fn request_funds(
        &self,
        endpoint: &EndpointCandidate,
        account: &str,
        amount: U256,
    ) -> Result<Option<String>, BalanceError>;
}

/// One client per chain family.
#[derive(Clone)]
pub struct ChainClients {
    evm: Arc<dyn RpcClient>,
    solana: Arc<dyn RpcClient>,
}

impl ChainClients {
    pub fn new(evm: Arc<dyn RpcClient>, solana: Arc<dyn RpcClient>) -> Self {
        Self { evm, solana }
    }

    /// Clients talking to real nodes over HTTP, both through `http`.
    pub fn live(http: reqwest::Client) -> Self {
        Self::new(
            Arc::new(EvmClient::new(http.clone())),
            Arc::new(SolanaClient::new(http)),
        )
    }

    pub fn for_chain(&self, chain_type: ChainType) -> &Arc<dyn RpcClient> {
        match chain_type {
            ChainType::Evm => &self.evm,
            ChainType::Solana => &self.solana,
        }
    }
}
