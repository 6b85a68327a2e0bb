//! Network table.
//!
//! The registry is built once from configuration and shared read-only. Order
//! is preserved so listings match the configured order.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::blockchain::models::{ChainType, NetworkDescriptor, RequestError};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("network key must not be empty")]
    EmptyKey,
    #[error("duplicate network key: {0}")]
    DuplicateKey(String),
    #[error("EVM network '{0}' has no chain_id")]
    MissingChainId(String),
    #[error("Solana network '{0}' has no cluster")]
    MissingCluster(String),
    #[error("network '{key}' has {decimals} decimals, at most {} supported", MAX_DECIMALS)]
    InvalidDecimals { key: String, decimals: u8 },
}

/// Largest decimals value whose unit (10^decimals) fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<NetworkDescriptor>,
}

impl NetworkRegistry {
    pub fn new(networks: Vec<NetworkDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for network in &networks {
            if network.key.trim().is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if !seen.insert(network.key.as_str()) {
                return Err(RegistryError::DuplicateKey(network.key.clone()));
            }
            match network.chain_type {
                ChainType::Evm if network.chain_id.is_none() => {
                    return Err(RegistryError::MissingChainId(network.key.clone()))
                }
                ChainType::Solana if network.cluster.is_none() => {
                    return Err(RegistryError::MissingCluster(network.key.clone()))
                }
                _ => {}
            }
            if let Some(decimals) = network.decimals.filter(|d| *d > MAX_DECIMALS) {
                return Err(RegistryError::InvalidDecimals {
                    key: network.key.clone(),
                    decimals,
                });
            }
        }
        Ok(Self { networks })
    }

    /// Reads a JSON array of descriptors.
    pub fn load_descriptors(path: &Path) -> Result<Vec<NetworkDescriptor>> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read networks file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid networks JSON in {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Result<&NetworkDescriptor, RequestError> {
        self.networks
            .iter()
            .find(|n| n.key == key)
            .ok_or_else(|| RequestError::UnknownNetwork(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.networks.iter().any(|n| n.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.networks.iter().map(|n| n.key.clone()).collect()
    }
}

/// Built-in testnet table used when no networks file is configured.
pub fn default_networks() -> Vec<NetworkDescriptor> {
    vec![
        NetworkDescriptor {
            key: "localhost".into(),
            name: "Localhost 8545".into(),
            chain_type: ChainType::Evm,
            chain_id: Some(31337),
            cluster: None,
            symbol: "ETH".into(),
            decimals: None,
            rpc_urls: vec!["http://127.0.0.1:8545".into()],
            explorer_url: None,
            faucet_url: Some("local".into()),
        },
        NetworkDescriptor {
            key: "sepolia".into(),
            name: "Sepolia Testnet".into(),
            chain_type: ChainType::Evm,
            chain_id: Some(11155111),
            cluster: None,
            symbol: "SepoliaETH".into(),
            decimals: None,
            rpc_urls: vec![
                "https://ethereum-sepolia-rpc.publicnode.com".into(),
                "https://rpc.sepolia.org".into(),
                "https://sepolia.drpc.org".into(),
            ],
            explorer_url: Some("https://sepolia.etherscan.io".into()),
            faucet_url: Some("https://sepoliafaucet.com".into()),
        },
        NetworkDescriptor {
            key: "solana-devnet".into(),
            name: "Solana Devnet".into(),
            chain_type: ChainType::Solana,
            chain_id: None,
            cluster: Some("devnet".into()),
            symbol: "SOL".into(),
            decimals: None,
            rpc_urls: vec!["https://api.devnet.solana.com".into()],
            explorer_url: Some("https://explorer.solana.com/?cluster=devnet".into()),
            faucet_url: Some("https://faucet.solana.com".into()),
        },
        NetworkDescriptor {
            key: "solana-testnet".into(),
            name: "Solana Testnet".into(),
            chain_type: ChainType::Solana,
            chain_id: None,
            cluster: Some("testnet".into()),
            symbol: "SOL".into(),
            decimals: None,
            rpc_urls: vec!["https://api.testnet.solana.com".into()],
            explorer_url: Some("https://explorer.solana.com/?cluster=testnet".into()),
            faucet_url: Some("https://faucet.solana.com".into()),
        },
        NetworkDescriptor {
            key: "solana-localnet".into(),
            name: "Solana Localnet".into(),
            chain_type: ChainType::Solana,
            chain_id: None,
            cluster: Some("localnet".into()),
            symbol: "SOL".into(),
            decimals: None,
            rpc_urls: vec!["http://127.0.0.1:8899".into()],
            explorer_url: None,
            faucet_url: Some("local".into()),
        },
    ]
}
