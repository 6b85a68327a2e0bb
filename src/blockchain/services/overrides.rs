// src/blockchain/services/overrides.rs
//
// Per-network RPC overrides chosen by the user, persisted as a small JSON
// file. The file is re-read on every lookup so edits made by another process
// are picked up without a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

use crate::blockchain::models::NetworkDescriptor;

#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("invalid RPC URL '{0}': expected an http(s) URL")]
    InvalidUrl(String),
    #[error("override storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("override storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredOverride {
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// Endpoints a lookup should try, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveEndpoints {
    pub urls: Vec<String>,
    /// True when a user override replaced the defaults
    pub custom: bool,
}

#[derive(Debug, Clone)]
pub struct RpcOverrides {
    path: Arc<PathBuf>,
    // Serializes read-modify-write cycles on the file.
    lock: Arc<RwLock<()>>,
}

impl RpcOverrides {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, StoredOverride>, OverrideError> {
        match tokio::fs::read_to_string(self.path.as_ref()).await {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, overrides: &HashMap<String, StoredOverride>) -> Result<(), OverrideError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(overrides)?;
        tokio::fs::write(self.path.as_ref(), raw).await?;
        Ok(())
    }

    /// Override URL for `network`, if one is set.
    pub async fn get(&self, network: &str) -> Result<Option<String>, OverrideError> {
        let _guard = self.lock.read().await;
        Ok(self.read_all().await?.remove(network).map(|o| o.url))
    }

    /// Sets the override for `network`, replacing any previous one.
    pub async fn set(&self, network: &str, url: &str) -> Result<(), OverrideError> {
        let url = url.trim();
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {}
            _ => return Err(OverrideError::InvalidUrl(url.to_string())),
        }

        let _guard = self.lock.write().await;
        let mut overrides = self.read_all().await?;
        overrides.insert(
            network.to_string(),
            StoredOverride {
                url: url.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.write_all(&overrides).await?;
        info!("Custom RPC for {} set to {}", network, url);
        Ok(())
    }

    /// Removes the override for `network`. Returns whether one existed.
    pub async fn clear(&self, network: &str) -> Result<bool, OverrideError> {
        let _guard = self.lock.write().await;
        let mut overrides = self.read_all().await?;
        let existed = overrides.remove(network).is_some();
        if existed {
            self.write_all(&overrides).await?;
            info!("Custom RPC for {} cleared", network);
        }
        Ok(existed)
    }

    /// The override alone when one is set, otherwise the network's defaults.
    /// A failed lookup counts as "no override".
    pub async fn endpoints_for(&self, network: &NetworkDescriptor) -> EffectiveEndpoints {
        match self.get(&network.key).await {
            Ok(Some(url)) => EffectiveEndpoints {
                urls: vec![url],
                custom: true,
            },
            Ok(None) => EffectiveEndpoints {
                urls: network.rpc_urls.clone(),
                custom: false,
            },
            Err(e) => {
                warn!(
                    "Override lookup for {} failed, using default endpoints: {}",
                    network.key, e
                );
                EffectiveEndpoints {
                    urls: network.rpc_urls.clone(),
                    custom: false,
                }
            }
        }
    }
}
