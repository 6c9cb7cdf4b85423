//! Ethereum RPC client.

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    transports::http::reqwest::Url,
};
use tokio::sync::OnceCell;

use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::{constants::FRAXTAL_CHAIN_ID, WalletManager},
};

/// Ethereum RPC client wrapper with lazy initialization.
///
/// Holds a read-only provider shared by all tools. Write paths build a
/// fresh signing provider per invocation via [`EthereumClient::signing_provider`].
#[derive(Clone)]
pub struct EthereumClient {
    /// Read-only provider.
    provider: DynProvider,
    /// Parsed RPC endpoint, reused for signing providers.
    rpc_url: Url,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self { provider, rpc_url: url, chain_id: Arc::new(OnceCell::new()) })
    }

    /// Get the chain ID (fetches from network on first call).
    ///
    /// Logs a warning once if the node is not Fraxtal mainnet.
    pub async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                if chain_id != FRAXTAL_CHAIN_ID {
                    tracing::warn!(
                        chain_id,
                        expected = FRAXTAL_CHAIN_ID,
                        "Connected node is not Fraxtal mainnet"
                    );
                }
                tracing::info!(chain_id, rpc_url = %self.rpc_url, "Connected to node");
                Ok(chain_id)
            })
            .await
            .copied()
    }

    /// Get the read-only provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Build a provider that signs and fills transactions for `wallet`.
    pub fn signing_provider(&self, wallet: &WalletManager) -> DynProvider {
        let signer = EthereumWallet::from(wallet.signer().clone());
        ProviderBuilder::new().wallet(signer).connect_http(self.rpc_url.clone()).erased()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_invalid_url() {
        let result = EthereumClient::new("not a url");
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("Invalid RPC URL")));
    }

    #[test]
    fn test_client_creation_is_lazy() {
        // Unroutable endpoint: construction must still succeed.
        let client = EthereumClient::new("http://127.0.0.1:1").expect("client");
        assert!(client.chain_id.get().is_none());
    }
}
