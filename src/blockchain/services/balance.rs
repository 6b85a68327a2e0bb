use std::sync::Arc;
use std::time::Duration;

use ethers::types::U256;
use tracing::{debug, error, info, warn};

use crate::blockchain::{
    client::{ChainClients, RpcClient},
    deadline::{with_deadline, EndpointBudgets},
    models::{
        BalanceError, BalanceQuery, BalanceReport, BalanceResult, EndpointCandidate,
        EndpointFailure, NetworkDescriptor, RequestError,
    },
    networks::NetworkRegistry,
    policy::MainnetPolicy,
    services::overrides::RpcOverrides,
};
use crate::utils::{format_units, is_valid_account};

/// Resolves a native balance by walking an ordered list of endpoints.
///
/// Endpoints are tried one at a time, in order, each under its own deadline.
/// The first endpoint that answers wins and nothing after it is contacted.
/// Local endpoints must first prove they are not serving a blocked chain.
#[derive(Clone)]
pub struct BalanceResolver {
    clients: ChainClients,
    policy: Arc<MainnetPolicy>,
    budgets: EndpointBudgets,
}

impl BalanceResolver {
    pub fn new(clients: ChainClients, policy: Arc<MainnetPolicy>, budgets: EndpointBudgets) -> Self {
        Self {
            clients,
            policy,
            budgets,
        }
    }

    pub fn policy(&self) -> &MainnetPolicy {
        &self.policy
    }

    pub fn budgets(&self) -> EndpointBudgets {
        self.budgets
    }

    pub fn clients(&self) -> &ChainClients {
        &self.clients
    }

    pub async fn resolve_balance(&self, query: &BalanceQuery) -> BalanceResult {
        if query.candidates.is_empty() {
            warn!("No RPC endpoint configured for {} balance lookup", query.chain_type);
            return BalanceResult::NoEndpointConfigured;
        }

        let client = self.clients.for_chain(query.chain_type);
        let mut diagnostics = Vec::new();

        for candidate in &query.candidates {
            let budget = self.budgets.for_class(candidate.class());
            debug!(
                "Trying {} endpoint {} ({:?}, budget {}ms)",
                query.chain_type,
                candidate.url(),
                candidate.class(),
                budget.as_millis()
            );

            let attempt = self.attempt(client.as_ref(), candidate, &query.account);
            let reason = match with_deadline(budget, attempt).await {
                Ok(Ok(raw)) => {
                    let balance = format_units(raw, query.decimals);
                    info!("Balance from {}: {}", candidate.url(), balance);
                    return BalanceResult::Resolved {
                        balance,
                        endpoint: candidate.url().to_string(),
                        diagnostics,
                    };
                }
                Ok(Err(err)) => err,
                Err(elapsed) => BalanceError::EndpointTimeout {
                    budget_ms: elapsed.budget_ms(),
                },
            };

            warn!("Failed RPC {}: {}", candidate.url(), reason);
            diagnostics.push(EndpointFailure {
                endpoint: candidate.label().to_string(),
                reason,
            });
        }

        error!(
            "All {} RPC endpoints failed for balance fetch: {:?}",
            diagnostics.len(),
            diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>()
        );
        BalanceResult::Exhausted { diagnostics }
    }

    async fn attempt(
        &self,
        client: &dyn RpcClient,
        candidate: &EndpointCandidate,
        account: &str,
    ) -> Result<U256, BalanceError> {
        if candidate.is_local() {
            let identity = client.chain_identity(candidate).await?;
            if self.policy.is_blocked(&identity) {
                return Err(BalanceError::PolicyViolation { identity });
            }
        }
        client.balance(candidate, account).await
    }
}

/// Caller-side balance lookup for a named network: picks endpoints
/// (override or defaults), applies the descriptor-level mainnet check and
/// bounds the whole resolution with an overall ceiling.
#[derive(Clone)]
pub struct BalanceService {
    registry: Arc<NetworkRegistry>,
    overrides: RpcOverrides,
    resolver: BalanceResolver,
    overall_timeout: Duration,
}

impl BalanceService {
    pub fn new(
        registry: Arc<NetworkRegistry>,
        overrides: RpcOverrides,
        resolver: BalanceResolver,
        overall_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            overrides,
            resolver,
            overall_timeout,
        }
    }

    /// Looks up the network and checks the account format for its chain.
    pub fn check_request(&self, network_key: &str, account: &str) -> Result<&NetworkDescriptor, RequestError> {
        let network = self.registry.get(network_key)?;
        if !is_valid_account(network.chain_type, account) {
            return Err(RequestError::InvalidAccount {
                chain_type: network.chain_type,
                account: account.to_string(),
            });
        }
        Ok(network)
    }

    pub async fn fetch_balance(&self, network_key: &str, account: &str) -> Result<BalanceReport, RequestError> {
        let network = self.check_request(network_key, account)?;
        let endpoints = self.overrides.endpoints_for(network).await;

        if endpoints.custom {
            info!("Using custom RPC for {}: {:?}", network.key, endpoints.urls);
        } else {
            info!("Using default RPC endpoints for {}", network.key);
        }

        let mut report = BalanceReport {
            network: network.key.clone(),
            account: account.to_string(),
            balance: BalanceResult::ZERO.to_string(),
            symbol: network.symbol.clone(),
            endpoint: None,
            custom_rpc: endpoints.custom,
            error: None,
            diagnostics: Vec::new(),
        };

        if let Some(identity) = self.resolver.policy().blocked_descriptor_identity(network) {
            warn!("Refusing balance lookup on {} ({})", network.key, identity);
            report.error = Some(BalanceError::PolicyViolation { identity });
            return Ok(report);
        }

        let query = BalanceQuery::new(account, &endpoints.urls, network.chain_type)
            .with_decimals(network.native_decimals());

        match with_deadline(self.overall_timeout, self.resolver.resolve_balance(&query)).await {
            Ok(result) => {
                report.balance = result.balance().to_string();
                report.diagnostics = result.diagnostic_lines();
                report.error = result.terminal_error();
                if let BalanceResult::Resolved { endpoint, .. } = result {
                    report.endpoint = Some(endpoint);
                }
            }
            Err(elapsed) => {
                error!(
                    "Balance fetch for {} on {} exceeded {}ms",
                    account,
                    network.key,
                    elapsed.budget_ms()
                );
                report.error = Some(BalanceError::OverallTimeout {
                    ceiling_ms: elapsed.budget_ms(),
                });
            }
        }

        Ok(report)
    }
}
