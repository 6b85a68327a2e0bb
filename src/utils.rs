//! Formatting and validation helpers shared by the services and API layer

use std::str::FromStr;

use ethers::types::{Address, U256};

use crate::blockchain::models::ChainType;

/// Renders an integer amount of base units as a decimal string of the native
/// unit, without trailing zeros: `1500000000000000000` at 18 decimals is `1.5`.
///
/// Works on the digit string, so any `decimals` value is accepted.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let decimals = decimals as usize;
    let digits = format!("{:0>width$}", amount.to_string(), width = decimals + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Checks that `account` is a well-formed address for the chain family.
pub fn is_valid_account(chain_type: ChainType, account: &str) -> bool {
    match chain_type {
        ChainType::Evm => Address::from_str(account).is_ok(),
        ChainType::Solana => bs58::decode(account)
            .into_vec()
            .map(|bytes| bytes.len() == 32)
            .unwrap_or(false),
    }
}
