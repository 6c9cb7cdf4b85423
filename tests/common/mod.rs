//! Common utilities for integration tests.

#![allow(dead_code)]

use bamm_mcp::{
    config::{DEFAULT_POOLS_API_URL, DEFAULT_RPC_URL},
    BammServer, Config,
};

/// Well-known development key (first account of the default Anvil mnemonic).
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Helper to create a test server from environment variables.
///
/// Network tests need a factory to enumerate pools, so `None` is returned
/// when `BAMM_FACTORY_ADDRESS` is unset.
pub fn create_test_server() -> Option<BammServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().ok()?;
    config.factory_address?;

    BammServer::new(config).ok()
}

/// Server built without touching the environment. Construction makes no
/// network calls, so this is usable for input validation tests.
pub fn offline_server(private_key: Option<&str>) -> BammServer {
    let config = Config {
        rpc_url: DEFAULT_RPC_URL.to_string(),
        private_key: private_key.map(str::to_string),
        factory_address: None,
        pools_api_url: DEFAULT_POOLS_API_URL.to_string(),
        log_level: "warn".to_string(),
    };

    BammServer::new(config).expect("offline server")
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: BAMM_FACTORY_ADDRESS not set");
                return;
            }
        }
    };
}
