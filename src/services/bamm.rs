//! BAMM write operations.
//!
//! Every operation runs as one sequential chain of calls for a single
//! acting account: resolve the token, guard the spend, build the call,
//! simulate, submit and wait for the receipt.

use std::sync::Arc;

use alloy::primitives::{Address, I256, U256};

use crate::{
    error::Result,
    ethereum::{EthereumClient, WalletManager},
    services::{
        chain::{BammReader, BammWriter, OnChainWriter},
        position_validator::PositionValidator,
        token_guard::{Erc20Ledger, TokenGuard, TokenLedger},
        token_resolver::TokenResolver,
    },
    types::{current_timestamp, ActionBuilder, ActionKind, TokenRef, TransactionResult},
};

/// Entry point for write operations, shared by all tool invocations.
#[derive(Clone)]
pub struct BammService {
    client: Arc<EthereumClient>,
    reader: Arc<dyn BammReader>,
    resolver: TokenResolver,
    builder: ActionBuilder,
}

impl BammService {
    pub fn new(
        client: Arc<EthereumClient>,
        reader: Arc<dyn BammReader>,
        resolver: TokenResolver,
        builder: ActionBuilder,
    ) -> Self {
        Self { client, reader, resolver, builder }
    }

    /// Bind the service to `wallet` for one invocation.
    ///
    /// Fails before anything is signed if the node cannot be reached.
    pub async fn for_account(
        &self,
        wallet: &WalletManager,
    ) -> Result<BammAccount<OnChainWriter, Erc20Ledger>> {
        self.client.chain_id().await?;
        let provider = self.client.signing_provider(wallet);
        let account = wallet.address();

        Ok(BammAccount::new(
            account,
            self.reader.clone(),
            OnChainWriter::new(provider.clone(), account),
            Erc20Ledger::new(provider, account),
            self.resolver.clone(),
            self.builder.clone(),
        ))
    }
}

/// Lending, withdrawing and position management for one acting account.
pub struct BammAccount<W, L> {
    account: Address,
    reader: Arc<dyn BammReader>,
    writer: W,
    guard: TokenGuard<L>,
    resolver: TokenResolver,
    validator: PositionValidator,
    builder: ActionBuilder,
}

impl<W: BammWriter, L: TokenLedger> BammAccount<W, L> {
    pub fn new(
        account: Address,
        reader: Arc<dyn BammReader>,
        writer: W,
        ledger: L,
        resolver: TokenResolver,
        builder: ActionBuilder,
    ) -> Self {
        let validator = PositionValidator::new(reader.clone());
        let guard = TokenGuard::new(ledger, account);
        Self { account, reader, writer, guard, resolver, validator, builder }
    }

    /// Deposit Fraxswap LP tokens into the pool through `mint`.
    pub async fn lend(&self, bamm: Address, amount: U256) -> Result<TransactionResult> {
        tracing::info!(bamm = %bamm, amount = %amount, "Lending LP tokens");

        let lp_token = self.reader.pair(bamm).await?;
        self.guard.prepare_spend(lp_token, bamm, amount).await?;
        let tx_hash = self.writer.mint(bamm, self.account, amount).await?;

        Ok(TransactionResult::new("lend", bamm, amount, tx_hash).with_token(None, lp_token))
    }

    /// Redeem BAMM share tokens for LP tokens through `redeem`.
    pub async fn withdraw(&self, bamm: Address, amount: U256) -> Result<TransactionResult> {
        tracing::info!(bamm = %bamm, amount = %amount, "Withdrawing LP tokens");

        let share_token = self.reader.share_token(bamm).await?;
        self.guard.prepare_spend(share_token, bamm, amount).await?;
        let tx_hash = self.writer.redeem(bamm, self.account, amount).await?;

        Ok(TransactionResult::new("withdraw", bamm, amount, tx_hash).with_token(None, share_token))
    }

    pub async fn add_collateral(
        &self,
        bamm: Address,
        token: TokenRef,
        amount: U256,
    ) -> Result<TransactionResult> {
        self.execute_action(ActionKind::AddCollateral, bamm, token, amount).await
    }

    pub async fn remove_collateral(
        &self,
        bamm: Address,
        token: TokenRef,
        amount: U256,
    ) -> Result<TransactionResult> {
        self.execute_action(ActionKind::RemoveCollateral, bamm, token, amount).await
    }

    pub async fn borrow(
        &self,
        bamm: Address,
        token: TokenRef,
        amount: U256,
    ) -> Result<TransactionResult> {
        self.execute_action(ActionKind::Borrow, bamm, token, amount).await
    }

    pub async fn repay(
        &self,
        bamm: Address,
        token: TokenRef,
        amount: U256,
    ) -> Result<TransactionResult> {
        self.execute_action(ActionKind::Repay, bamm, token, amount).await
    }

    /// Run one `executeActions` operation.
    ///
    /// Removing collateral moves tokens out of the pool, so it skips the
    /// balance and allowance checks the other kinds perform.
    async fn execute_action(
        &self,
        kind: ActionKind,
        bamm: Address,
        token: TokenRef,
        amount: U256,
    ) -> Result<TransactionResult> {
        tracing::info!(
            kind = %kind,
            bamm = %bamm,
            token = %token,
            amount = %amount,
            "Executing BAMM action"
        );

        let token_address = self.resolver.resolve(&token).await?;
        let side = self.validator.validate(bamm, token_address).await?;

        if kind != ActionKind::RemoveCollateral {
            self.guard.prepare_spend(token_address, bamm, amount).await?;
        }

        let rent = if kind.changes_rent() {
            let multiplier = self.reader.rented_multiplier(bamm).await?;
            kind.rent_delta(amount, multiplier)?
        } else {
            I256::ZERO
        };

        let action =
            self.builder.build(kind, side, amount, rent, self.account, current_timestamp())?;
        let tx_hash = self.writer.execute_actions(bamm, action).await?;

        let symbol = match &token {
            TokenRef::Symbol(symbol) => Some(symbol.clone()),
            TokenRef::Address(_) => None,
        };
        Ok(TransactionResult::new(&kind.to_string(), bamm, amount, tx_hash)
            .with_token(symbol, token_address)
            .with_side(side))
    }
}
