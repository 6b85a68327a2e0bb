// src/blockchain/mod.rs

// Re-export the client module with the chain clients
pub mod client;
pub use client::{ChainClients, RpcClient};

pub mod deadline;
pub mod evm_client;
pub mod models;
pub mod networks;
pub mod policy;
pub mod rpc;
pub mod services;
pub mod solana_client;

// Re-export commonly used types
pub use ethers::types::U256;
