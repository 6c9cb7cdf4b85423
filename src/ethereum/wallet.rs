//! Wallet management.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::error::{AppError, Result};

/// Acting account for write operations.
///
/// Built per tool invocation from the configured key, so no signer state is
/// shared between calls.
#[derive(Clone)]
pub struct WalletManager {
    signer: PrivateKeySigner,
    address: Address,
}

impl WalletManager {
    /// Build a wallet from the optional configured key.
    ///
    /// Returns [`AppError::MissingCredential`] when no key is configured.
    pub fn from_optional_key(private_key: Option<&str>) -> Result<Self> {
        match private_key {
            Some(key) => Self::from_private_key(key),
            None => Err(AppError::MissingCredential),
        }
    }

    /// Create a wallet from a private key string (`0x` prefix optional).
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;
        let address = signer.address();

        tracing::debug!(address = %address, "Wallet loaded");

        Ok(Self { signer, address })
    }

    /// Address of the acting account.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
