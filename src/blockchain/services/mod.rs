pub mod balance;
pub mod faucet;
pub mod overrides;
pub mod refresh;
