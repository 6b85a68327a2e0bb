// src/config.rs

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use ethers::types::U256;

use crate::blockchain::{
    deadline::EndpointBudgets,
    models::NetworkDescriptor,
    networks::{default_networks, NetworkRegistry},
    policy::DEFAULT_BLOCKED_CHAIN_IDS,
};

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Selectable networks, in display order
    pub networks: Vec<NetworkDescriptor>,
    pub default_network: String,

    // Balance resolution budgets
    pub local_endpoint_timeout: Duration,
    pub public_endpoint_timeout: Duration,
    /// Ceiling around a whole multi-endpoint resolution
    pub balance_timeout: Duration,
    pub refresh_interval: Duration,

    /// EVM chain ids the wallet refuses to talk to
    pub blocked_chain_ids: Vec<u64>,

    /// Where per-network RPC overrides are persisted
    pub rpc_overrides_path: PathBuf,

    // Faucet settings
    pub dev_faucet_amount_wei: U256,
    pub solana_airdrop_lamports: u64,
}

impl Default for Config {
    fn default() -> Self {
        let budgets = EndpointBudgets::default();
        Self {
            port: 8080,
            networks: default_networks(),
            default_network: "sepolia".to_string(),
            local_endpoint_timeout: budgets.local,
            public_endpoint_timeout: budgets.public,
            balance_timeout: Duration::from_millis(12_000),
            refresh_interval: Duration::from_secs(10),
            blocked_chain_ids: DEFAULT_BLOCKED_CHAIN_IDS.to_vec(),
            rpc_overrides_path: default_overrides_path(),
            // 10 ETH
            dev_faucet_amount_wei: U256::exp10(19),
            // 1 SOL
            solana_airdrop_lamports: 1_000_000_000,
        }
    }
}

fn default_overrides_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".testnet-wallet");
    path.push("rpc_overrides.json");
    path
}

/// Parses `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_chain_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("BLOCKED_CHAIN_IDS entry '{}' is not a number", s))
        })
        .collect()
}

impl Config {
    pub fn endpoint_budgets(&self) -> EndpointBudgets {
        EndpointBudgets {
            local: self.local_endpoint_timeout,
            public: self.public_endpoint_timeout,
        }
    }

    /// Builds the validated network registry.
    pub fn registry(&self) -> Result<NetworkRegistry> {
        NetworkRegistry::new(self.networks.clone()).context("Invalid network table")
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let networks = match env::var("NETWORKS_FILE") {
            Ok(path) => NetworkRegistry::load_descriptors(&PathBuf::from(path))?,
            Err(_) => defaults.networks,
        };

        let blocked_chain_ids = match env::var("BLOCKED_CHAIN_IDS") {
            Ok(raw) => parse_chain_ids(&raw)?,
            Err(_) => defaults.blocked_chain_ids,
        };

        let rpc_overrides_path = env::var("RPC_OVERRIDES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.rpc_overrides_path);

        let dev_faucet_amount_wei = match env::var("DEV_FAUCET_AMOUNT_WEI") {
            Ok(raw) => U256::from_dec_str(raw.trim())
                .map_err(|e| anyhow::anyhow!("DEV_FAUCET_AMOUNT_WEI must be a decimal integer: {}", e))?,
            Err(_) => defaults.dev_faucet_amount_wei,
        };

        let config = Config {
            port: env_or("PORT", defaults.port)?,
            networks,
            default_network: env::var("DEFAULT_NETWORK").unwrap_or(defaults.default_network),
            local_endpoint_timeout: Duration::from_millis(env_or(
                "LOCAL_ENDPOINT_TIMEOUT_MS",
                defaults.local_endpoint_timeout.as_millis() as u64,
            )?),
            public_endpoint_timeout: Duration::from_millis(env_or(
                "PUBLIC_ENDPOINT_TIMEOUT_MS",
                defaults.public_endpoint_timeout.as_millis() as u64,
            )?),
            balance_timeout: Duration::from_millis(env_or(
                "BALANCE_TIMEOUT_MS",
                defaults.balance_timeout.as_millis() as u64,
            )?),
            refresh_interval: Duration::from_secs(env_or(
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval.as_secs(),
            )?),
            blocked_chain_ids,
            rpc_overrides_path,
            dev_faucet_amount_wei,
            solana_airdrop_lamports: env_or("SOLANA_AIRDROP_LAMPORTS", defaults.solana_airdrop_lamports)?,
        };

        let registry = config.registry()?;
        if !registry.contains(&config.default_network) {
            anyhow::bail!(
                "DEFAULT_NETWORK '{}' is not a configured network. Available: {}",
                config.default_network,
                registry.keys().join(", ")
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_budgets() {
        let config = Config::default();
        assert_eq!(config.endpoint_budgets(), EndpointBudgets::default());
        assert_eq!(config.balance_timeout, Duration::from_secs(12));
        assert!(config.blocked_chain_ids.contains(&1));
        assert!(config.registry().is_ok());
    }

    #[test]
    fn parses_blocked_chain_list() {
        assert_eq!(parse_chain_ids("1, 56,,137").unwrap(), vec![1, 56, 137]);
        assert!(parse_chain_ids("1,mainnet").is_err());
    }
}
