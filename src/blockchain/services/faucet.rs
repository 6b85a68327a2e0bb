// src/blockchain/services/faucet.rs

use ethers::types::U256;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::blockchain::{
    deadline::with_deadline,
    models::{BalanceError, ChainIdentity, ChainType, EndpointCandidate, RequestError},
    networks::NetworkRegistry,
    services::{balance::BalanceResolver, overrides::RpcOverrides},
};
use crate::utils::{format_units, is_valid_account};

#[derive(Error, Debug)]
pub enum FaucetError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("no faucet available for {0}")]
    Unavailable(String),
    #[error("mainnet not allowed ({0})")]
    MainnetBlocked(ChainIdentity),
    #[error("faucet request failed: {0}")]
    Failed(BalanceError),
}

/// What the faucet did for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaucetOutcome {
    /// Solana airdrop submitted
    Airdrop { signature: String, amount: String },
    /// Local dev node balance set directly
    DevNodeFunded { amount: String },
    /// External faucet page the UI should open
    External { url: String },
}

#[derive(Clone)]
pub struct FaucetService {
    registry: Arc<NetworkRegistry>,
    overrides: RpcOverrides,
    resolver: BalanceResolver,
    dev_amount_wei: U256,
    airdrop_lamports: u64,
}

impl FaucetService {
    pub fn new(
        registry: Arc<NetworkRegistry>,
        overrides: RpcOverrides,
        resolver: BalanceResolver,
        dev_amount_wei: U256,
        airdrop_lamports: u64,
    ) -> Self {
        Self {
            registry,
            overrides,
            resolver,
            dev_amount_wei,
            airdrop_lamports,
        }
    }

    /// Requests test funds for `account` on `network_key`.
    ///
    /// Solana networks get an on-chain airdrop. EVM networks with a `local`
    /// faucet get their balance set on the dev node; other EVM networks hand
    /// back the external faucet URL.
    pub async fn request_funds(&self, network_key: &str, account: &str) -> Result<FaucetOutcome, FaucetError> {
        let network = self.registry.get(network_key)?;
        if !is_valid_account(network.chain_type, account) {
            return Err(RequestError::InvalidAccount {
                chain_type: network.chain_type,
                account: account.to_string(),
            }
            .into());
        }

        if let Some(identity) = self.resolver.policy().blocked_descriptor_identity(network) {
            return Err(FaucetError::MainnetBlocked(identity));
        }

        let (amount, decimals) = match (network.chain_type, network.faucet_url.as_deref()) {
            (ChainType::Solana, _) => (U256::from(self.airdrop_lamports), network.native_decimals()),
            (ChainType::Evm, Some("local")) => (self.dev_amount_wei, network.native_decimals()),
            (ChainType::Evm, Some(url)) => {
                return Ok(FaucetOutcome::External { url: url.to_string() });
            }
            (ChainType::Evm, None) => return Err(FaucetError::Unavailable(network.key.clone())),
        };

        let endpoints = self.overrides.endpoints_for(network).await;
        let endpoint = endpoints
            .urls
            .first()
            .map(EndpointCandidate::new)
            .ok_or(FaucetError::Failed(BalanceError::NoEndpointConfigured))?;

        if network.chain_type == ChainType::Evm && !endpoint.is_local() {
            warn!("Dev faucet for {} needs a local node, got {}", network.key, endpoint.url());
            return Err(FaucetError::Unavailable(network.key.clone()));
        }

        let client = self.resolver.clients().for_chain(network.chain_type).clone();
        let budget = self.resolver.budgets().for_class(endpoint.class());
        let policy = self.resolver.policy();

        let attempt = async {
            if endpoint.is_local() {
                let identity = client.chain_identity(&endpoint).await.map_err(FaucetError::Failed)?;
                if policy.is_blocked(&identity) {
                    return Err(FaucetError::MainnetBlocked(identity));
                }
            }
            client
                .request_funds(&endpoint, account, amount)
                .await
                .map_err(FaucetError::Failed)
        };

        let signature = with_deadline(budget, attempt).await.map_err(|elapsed| {
            FaucetError::Failed(BalanceError::EndpointTimeout {
                budget_ms: elapsed.budget_ms(),
            })
        })??;

        let amount = format_units(amount, decimals);
        info!("Funded {} with {} {} on {}", account, amount, network.symbol, network.key);

        Ok(match signature {
            Some(signature) => FaucetOutcome::Airdrop { signature, amount },
            None => FaucetOutcome::DevNodeFunded { amount },
        })
    }
}
