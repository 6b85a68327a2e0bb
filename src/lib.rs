// src/lib.rs

use std::sync::Arc;

use anyhow::Result;

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod utils;

use blockchain::{
    client::ChainClients,
    networks::NetworkRegistry,
    policy::MainnetPolicy,
    services::{
        balance::{BalanceResolver, BalanceService},
        faucet::FaucetService,
        overrides::RpcOverrides,
    },
};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::Config>,
    /// Selectable networks
    pub registry: Arc<NetworkRegistry>,
    /// Per-network RPC overrides
    pub overrides: RpcOverrides,
    /// Balance lookups with endpoint fallback
    pub balance_service: BalanceService,
    /// Testnet funding
    pub faucet_service: FaucetService,
}

impl AppState {
    /// Wires the services together from configuration and chain clients.
    pub fn new(config: config::Config, clients: ChainClients) -> Result<Self> {
        let registry = Arc::new(config.registry()?);
        let overrides = RpcOverrides::new(config.rpc_overrides_path.clone());
        let policy = Arc::new(MainnetPolicy::new(config.blocked_chain_ids.iter().copied()));
        let resolver = BalanceResolver::new(clients, policy, config.endpoint_budgets());

        let balance_service = BalanceService::new(
            Arc::clone(&registry),
            overrides.clone(),
            resolver.clone(),
            config.balance_timeout,
        );
        let faucet_service = FaucetService::new(
            Arc::clone(&registry),
            overrides.clone(),
            resolver,
            config.dev_faucet_amount_wei,
            config.solana_airdrop_lamports,
        );

        Ok(Self {
            config: Arc::new(config),
            registry,
            overrides,
            balance_service,
            faucet_service,
        })
    }
}
