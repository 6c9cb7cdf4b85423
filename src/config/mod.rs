//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;

use alloy::primitives::Address;

use crate::error::AppError;

/// Fraxtal mainnet JSON-RPC endpoint, used when `BAMM_RPC_URL` is unset.
pub const DEFAULT_RPC_URL: &str = "https://rpc.frax.com";

/// Frax pools listing endpoint, used when `FRAX_POOLS_API_URL` is unset.
pub const DEFAULT_POOLS_API_URL: &str = "https://api.frax.finance/v2/fraxswap/pools";

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key of the acting account. Only write and position tools need it.
    pub private_key: Option<String>,
    /// BAMM factory contract enumerating all pools.
    pub factory_address: Option<Address>,
    /// Base URL of the Fraxswap pools API.
    pub pools_api_url: String,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `BAMM_RPC_URL`: JSON-RPC endpoint (default: Fraxtal mainnet)
    /// - `WALLET_PRIVATE_KEY`: private key (hex, `0x` optional)
    /// - `BAMM_FACTORY_ADDRESS`: factory used by the positions and pool stats tools
    /// - `FRAX_POOLS_API_URL`: pools listing endpoint
    /// - `LOG_LEVEL`: logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = non_empty_var("BAMM_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let private_key = non_empty_var("WALLET_PRIVATE_KEY");

        let factory_address = non_empty_var("BAMM_FACTORY_ADDRESS")
            .map(|raw| {
                raw.trim().parse::<Address>().map_err(|e| {
                    AppError::Config(format!("Invalid BAMM_FACTORY_ADDRESS '{}': {}", raw, e))
                })
            })
            .transpose()?;

        let pools_api_url = non_empty_var("FRAX_POOLS_API_URL")
            .unwrap_or_else(|| DEFAULT_POOLS_API_URL.to_string());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self { rpc_url, private_key, factory_address, pools_api_url, log_level })
    }

    /// The factory address, or a configuration error naming the missing variable.
    pub fn require_factory(&self) -> Result<Address, AppError> {
        self.factory_address.ok_or_else(|| {
            AppError::Config("BAMM_FACTORY_ADDRESS environment variable not set".into())
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("factory_address", &self.factory_address)
            .field("pools_api_url", &self.pools_api_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
