//! Ethereum interaction module.
//!
//! Contains the RPC client, wallet management, contract bindings and the
//! transaction executor.

pub mod client;
pub mod constants;
pub mod contracts;
pub mod executor;
pub mod wallet;

pub use client::EthereumClient;
pub use executor::simulate_and_send;
pub use wallet::WalletManager;
