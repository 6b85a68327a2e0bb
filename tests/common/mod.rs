//! Scripted RPC client shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wallet_balance::blockchain::{
    client::{ChainClients, RpcClient},
    models::{BalanceError, ChainIdentity, EndpointCandidate},
    U256,
};

pub const ACCOUNT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const SOL_ACCOUNT: &str = "11111111111111111111111111111111";

/// Ether amount in wei, to micro-ether precision: `ether(1.5)` is 1.5 ETH.
pub fn ether(amount: f64) -> U256 {
    U256::from((amount * 1e6).round() as u128) * U256::exp10(12)
}

#[derive(Debug, Clone)]
pub struct Script {
    pub identity: Option<ChainIdentity>,
    pub balance: Result<U256, String>,
    pub funds: Option<String>,
    pub delay: Duration,
}

impl Script {
    pub fn balance(raw: U256) -> Self {
        Self {
            identity: None,
            balance: Ok(raw),
            funds: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            balance: Err(message.to_string()),
            ..Self::balance(U256::zero())
        }
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.identity = Some(ChainIdentity::Evm { chain_id });
        self
    }

    pub fn genesis(mut self, hash: &str) -> Self {
        self.identity = Some(ChainIdentity::Solana {
            genesis_hash: hash.to_string(),
        });
        self
    }

    pub fn funds(mut self, signature: Option<&str>) -> Self {
        self.funds = signature.map(str::to_string);
        self
    }

    /// Every call to this endpoint takes `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub method: &'static str,
}

#[derive(Debug, Default)]
pub struct ScriptedClient {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    async fn enter(&self, endpoint: &EndpointCandidate, method: &'static str) -> Result<Script, BalanceError> {
        self.calls.lock().unwrap().push(Call {
            url: endpoint.url().to_string(),
            method,
        });
        let script = self
            .scripts
            .get(endpoint.url())
            .cloned()
            .ok_or_else(|| BalanceError::ConnectionFailure("connection refused".into()))?;
        tokio::time::sleep(script.delay).await;
        Ok(script)
    }
}

#[async_trait]
impl RpcClient for ScriptedClient {
    async fn chain_identity(&self, endpoint: &EndpointCandidate) -> Result<ChainIdentity, BalanceError> {
        self.enter(endpoint, "chain_identity")
            .await?
            .identity
            .ok_or_else(|| BalanceError::ConnectionFailure("method not found".into()))
    }

    async fn balance(&self, endpoint: &EndpointCandidate, _account: &str) -> Result<U256, BalanceError> {
        self.enter(endpoint, "balance")
            .await?
            .balance
            .map_err(BalanceError::ConnectionFailure)
    }

    async fn request_funds(
        &self,
        endpoint: &EndpointCandidate,
        _account: &str,
        _amount: U256,
    ) -> Result<Option<String>, BalanceError> {
        Ok(self.enter(endpoint, "request_funds").await?.funds)
    }
}

/// Same scripted client behind both chain families.
pub fn clients(client: &Arc<ScriptedClient>) -> ChainClients {
    ChainClients::new(client.clone(), client.clone())
}
