// src/blockchain/policy.rs

use std::collections::HashSet;

use crate::blockchain::models::{ChainIdentity, ChainType, NetworkDescriptor};

/// Genesis hash of Solana mainnet-beta.
pub const SOLANA_MAINNET_GENESIS: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";

/// EVM mainnets refused by default: Ethereum, Optimism, BNB Chain, Polygon,
/// Base, Arbitrum One and Avalanche C-Chain.
pub const DEFAULT_BLOCKED_CHAIN_IDS: &[u64] = &[1, 10, 56, 137, 8453, 42161, 43114];

/// Chains this wallet must never talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainnetPolicy {
    blocked_chain_ids: HashSet<u64>,
    blocked_genesis_hashes: HashSet<String>,
    blocked_clusters: HashSet<String>,
}

impl Default for MainnetPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKED_CHAIN_IDS.iter().copied())
    }
}

impl MainnetPolicy {
    /// Blocks the given EVM chain ids plus Solana mainnet-beta.
    pub fn new(blocked_chain_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            blocked_chain_ids: blocked_chain_ids.into_iter().collect(),
            blocked_genesis_hashes: HashSet::from([SOLANA_MAINNET_GENESIS.to_string()]),
            blocked_clusters: HashSet::from(["mainnet-beta".to_string(), "mainnet".to_string()]),
        }
    }

    pub fn is_chain_id_blocked(&self, chain_id: u64) -> bool {
        self.blocked_chain_ids.contains(&chain_id)
    }

    /// Checks an identity reported live by a node.
    pub fn is_blocked(&self, identity: &ChainIdentity) -> bool {
        match identity {
            ChainIdentity::Evm { chain_id } => self.is_chain_id_blocked(*chain_id),
            ChainIdentity::Solana { genesis_hash } => {
                self.blocked_genesis_hashes.contains(genesis_hash)
            }
        }
    }

    /// Checks the identity a descriptor claims, before any endpoint is
    /// contacted. Returns that identity when it is blocked.
    pub fn blocked_descriptor_identity(&self, network: &NetworkDescriptor) -> Option<ChainIdentity> {
        match network.chain_type {
            ChainType::Evm => network
                .chain_id
                .filter(|id| self.is_chain_id_blocked(*id))
                .map(|chain_id| ChainIdentity::Evm { chain_id }),
            ChainType::Solana => network
                .cluster
                .as_ref()
                .filter(|cluster| self.blocked_clusters.contains(cluster.as_str()))
                .map(|_| ChainIdentity::Solana {
                    genesis_hash: SOLANA_MAINNET_GENESIS.to_string(),
                }),
        }
    }
}
