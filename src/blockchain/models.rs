// src/blockchain/models.rs
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

// --- Chain families ---

/// Chain family a network belongs to. Decides which RPC dialect is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Evm,
    Solana,
}

impl ChainType {
    /// Decimals of the native unit (wei for EVM, lamports for Solana).
    pub fn native_decimals(self) -> u8 {
        match self {
            ChainType::Evm => 18,
            ChainType::Solana => 9,
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::Evm => write!(f, "EVM"),
            ChainType::Solana => write!(f, "Solana"),
        }
    }
}

/// Identity reported by a node, used by the mainnet policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChainIdentity {
    Evm { chain_id: u64 },
    Solana { genesis_hash: String },
}

impl fmt::Display for ChainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainIdentity::Evm { chain_id } => write!(f, "chain id {}", chain_id),
            ChainIdentity::Solana { genesis_hash } => write!(f, "genesis {}", genesis_hash),
        }
    }
}

// --- Network Models ---

/// Static description of a selectable network, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// Lookup key, e.g. `sepolia` or `solana-devnet`
    pub key: String,
    /// Display name
    pub name: String,
    pub chain_type: ChainType,
    /// EVM chain id (EVM networks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Solana cluster name (Solana networks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// Native token symbol
    pub symbol: String,
    /// Overrides the chain family's native decimals when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Default RPC endpoints, tried in order
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Faucet URL; the literal `local` means the node itself can mint funds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faucet_url: Option<String>,
}

impl NetworkDescriptor {
    pub fn native_decimals(&self) -> u8 {
        self.decimals
            .unwrap_or_else(|| self.chain_type.native_decimals())
    }

    /// Chain/cluster id as shown to users.
    pub fn display_id(&self) -> String {
        match (self.chain_id, self.cluster.as_ref()) {
            (Some(id), _) => id.to_string(),
            (None, Some(cluster)) => cluster.clone(),
            (None, None) => String::from("unknown"),
        }
    }
}

// --- Endpoint Models ---

/// Whether an endpoint addresses this machine or a remote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointClass {
    Local,
    Public,
}

/// A single RPC URL together with its derived classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidate {
    url: String,
    class: EndpointClass,
    label: String,
}

impl EndpointCandidate {
    /// Classifies `url` as local when its host is `localhost` or a loopback
    /// address. URLs that do not parse are treated as public and fail later
    /// at connect time.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let parsed = Url::parse(&url).ok();

        let class = match parsed.as_ref().and_then(|u| u.host()) {
            Some(Host::Domain(domain)) if domain.eq_ignore_ascii_case("localhost") => {
                EndpointClass::Local
            }
            Some(Host::Ipv4(ip)) if IpAddr::V4(ip).is_loopback() => EndpointClass::Local,
            Some(Host::Ipv6(ip)) if IpAddr::V6(ip).is_loopback() => EndpointClass::Local,
            _ => EndpointClass::Public,
        };

        let label = match parsed.as_ref().and_then(|u| u.host_str().map(|h| (h, u.port()))) {
            Some((host, Some(port))) => format!("{}:{}", host, port),
            Some((host, None)) => host.to_string(),
            None => url.clone(),
        };

        Self { url, class, label }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn class(&self) -> EndpointClass {
        self.class
    }

    pub fn is_local(&self) -> bool {
        self.class == EndpointClass::Local
    }

    /// Short `host[:port]` form used in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }
}

// --- Balance Models ---

/// One balance lookup: who, where, and how to read the answer.
#[derive(Debug, Clone)]
pub struct BalanceQuery {
    pub account: String,
    pub candidates: Vec<EndpointCandidate>,
    pub chain_type: ChainType,
    pub decimals: u8,
}

impl BalanceQuery {
    pub fn new(account: impl Into<String>, urls: &[String], chain_type: ChainType) -> Self {
        Self {
            account: account.into(),
            candidates: urls.iter().map(EndpointCandidate::new).collect(),
            chain_type,
            decimals: chain_type.native_decimals(),
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Why a single endpoint did not produce a balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: BalanceError,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

/// Outcome of a resolution. Never an error: exhaustion is a zero sentinel
/// carrying the per-endpoint diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceResult {
    Resolved {
        balance: String,
        endpoint: String,
        diagnostics: Vec<EndpointFailure>,
    },
    Exhausted {
        diagnostics: Vec<EndpointFailure>,
    },
    NoEndpointConfigured,
}

impl BalanceResult {
    pub const ZERO: &'static str = "0";

    /// Decimal balance, or `"0"` when nothing resolved.
    pub fn balance(&self) -> &str {
        match self {
            BalanceResult::Resolved { balance, .. } => balance,
            _ => Self::ZERO,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BalanceResult::Resolved { .. })
    }

    pub fn diagnostics(&self) -> &[EndpointFailure] {
        match self {
            BalanceResult::Resolved { diagnostics, .. }
            | BalanceResult::Exhausted { diagnostics } => diagnostics,
            BalanceResult::NoEndpointConfigured => &[],
        }
    }

    /// Diagnostics rendered as `host[:port]: reason`.
    pub fn diagnostic_lines(&self) -> Vec<String> {
        self.diagnostics().iter().map(ToString::to_string).collect()
    }

    /// The reason the resolution as a whole failed: the last endpoint's
    /// failure, or `NoEndpointConfigured`. `None` on success.
    pub fn terminal_error(&self) -> Option<BalanceError> {
        match self {
            BalanceResult::Resolved { .. } => None,
            BalanceResult::Exhausted { diagnostics } => {
                diagnostics.last().map(|failure| failure.reason.clone())
            }
            BalanceResult::NoEndpointConfigured => Some(BalanceError::NoEndpointConfigured),
        }
    }

    pub fn is_mainnet_blocked(&self) -> bool {
        matches!(
            self.terminal_error(),
            Some(BalanceError::PolicyViolation { .. })
        )
    }
}

// --- Error types for balance resolution ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("no endpoint configured")]
    NoEndpointConfigured,
    #[error("timed out after {budget_ms}ms")]
    EndpointTimeout { budget_ms: u64 },
    #[error("{0}")]
    ConnectionFailure(String),
    #[error("mainnet not allowed")]
    PolicyViolation { identity: ChainIdentity },
    #[error("balance fetch timed out after {ceiling_ms}ms")]
    OverallTimeout { ceiling_ms: u64 },
    #[error("invalid account: {0}")]
    InvalidAccount(String),
}

impl BalanceError {
    /// Stable machine-readable tag for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            BalanceError::NoEndpointConfigured => "no_endpoint",
            BalanceError::EndpointTimeout { .. } => "endpoint_timeout",
            BalanceError::ConnectionFailure(_) => "connection_failure",
            BalanceError::PolicyViolation { .. } => "mainnet_blocked",
            BalanceError::OverallTimeout { .. } => "overall_timeout",
            BalanceError::InvalidAccount(_) => "invalid_account",
        }
    }
}

impl Serialize for BalanceError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BalanceError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Errors raised before any resolution starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    #[error("invalid {chain_type} account: {account}")]
    InvalidAccount { chain_type: ChainType, account: String },
}

/// Report handed to the UI for one balance request.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub network: String,
    pub account: String,
    pub balance: String,
    pub symbol: String,
    /// Endpoint that answered, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Whether a user override replaced the default endpoints
    pub custom_rpc: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BalanceError>,
    pub diagnostics: Vec<String>,
}

impl BalanceReport {
    pub fn is_mainnet_blocked(&self) -> bool {
        matches!(self.error, Some(BalanceError::PolicyViolation { .. }))
    }
}
