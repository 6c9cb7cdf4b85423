//! Balance and allowance checks ahead of a token transfer into a BAMM pool.

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::DynProvider,
};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    ethereum::{constants::WAD_DECIMALS, contracts::IERC20, simulate_and_send},
};

/// ERC20 reads and the one write the guard needs.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    async fn decimals(&self, token: Address) -> Result<u8>;

    /// Approve `spender` for exactly `amount` and wait for the approval to be mined.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;
}

/// On-chain ledger acting for `owner` through a signing provider.
#[derive(Clone)]
pub struct Erc20Ledger {
    provider: DynProvider,
    owner: Address,
}

impl Erc20Ledger {
    pub fn new(provider: DynProvider, owner: Address) -> Self {
        Self { provider, owner }
    }
}

#[async_trait]
impl TokenLedger for Erc20Ledger {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let contract = IERC20::new(token, self.provider.clone());
        Ok(contract.balanceOf(owner).call().await?)
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let contract = IERC20::new(token, self.provider.clone());
        Ok(contract.allowance(owner, spender).call().await?)
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let contract = IERC20::new(token, self.provider.clone());
        Ok(contract.decimals().call().await?)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let contract = IERC20::new(token, self.provider.clone());
        simulate_and_send(contract.approve(spender, amount).from(self.owner), "approve").await
    }
}

/// Guards a spend of `owner`'s tokens by a BAMM pool.
pub struct TokenGuard<L> {
    ledger: L,
    owner: Address,
}

impl<L: TokenLedger> TokenGuard<L> {
    pub fn new(ledger: L, owner: Address) -> Self {
        Self { ledger, owner }
    }

    /// Fail with [`AppError::InsufficientBalance`] unless `owner` holds `required`.
    pub async fn ensure_balance(&self, token: Address, required: U256) -> Result<U256> {
        let available = self.ledger.balance_of(token, self.owner).await?;
        tracing::debug!(token = %token, available = %available, required = %required, "Checked balance");

        if available < required {
            return Err(AppError::InsufficientBalance { token, required, available });
        }
        Ok(available)
    }

    /// Raise the allowance to exactly `required` if it is currently lower.
    ///
    /// Returns the approval transaction hash, or `None` when the existing
    /// allowance already covers the spend. Never lowers an allowance.
    pub async fn ensure_allowance(
        &self,
        token: Address,
        spender: Address,
        required: U256,
    ) -> Result<Option<TxHash>> {
        let current = self.ledger.allowance(token, self.owner, spender).await?;
        if current >= required {
            tracing::debug!(token = %token, spender = %spender, "Allowance sufficient");
            return Ok(None);
        }

        tracing::info!(
            token = %token,
            spender = %spender,
            current = %current,
            required = %required,
            "Approving token spend"
        );
        let tx_hash = self.ledger.approve(token, spender, required).await?;
        Ok(Some(tx_hash))
    }

    /// Balance check followed by allowance top-up.
    pub async fn prepare_spend(
        &self,
        token: Address,
        spender: Address,
        required: U256,
    ) -> Result<Option<TxHash>> {
        self.warn_unless_wad(token).await;
        self.ensure_balance(token, required).await?;
        self.ensure_allowance(token, spender, required).await
    }

    /// Amounts are always scaled by 1e18; flag tokens where that is wrong.
    async fn warn_unless_wad(&self, token: Address) {
        match self.ledger.decimals(token).await {
            Ok(decimals) if decimals != WAD_DECIMALS => tracing::warn!(
                token = %token,
                decimals,
                "Token does not use 18 decimals; the amount is scaled by 1e18 regardless"
            ),
            Ok(_) => {}
            Err(e) => tracing::debug!(token = %token, error = %e, "Could not read token decimals"),
        }
    }
}
