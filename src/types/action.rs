//! BAMM action construction.
//!
//! Collateral and borrow operations all go through the pool's single
//! `executeActions` entry point. The builder here turns an operation kind, the
//! side of the pool the token occupies and an amount into that record.

use std::time::SystemTime;

use alloy::primitives::{Address, B256, I256, U256};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{ACTION_DEADLINE_SECS, WAD},
        contracts::IBamm,
    },
};

/// Get current Unix timestamp in seconds.
/// Returns 0 if system time is before Unix epoch (should never happen in practice).
pub fn current_timestamp() -> u64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Which of the pool's two assets a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSide {
    /// The pool's `token0`.
    Asset0,
    /// The pool's `token1`.
    Asset1,
}

/// Position changes expressed as an `executeActions` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddCollateral,
    RemoveCollateral,
    Borrow,
    Repay,
}

impl ActionKind {
    /// True when tokens leave the pool towards the user.
    pub fn is_outflow(self) -> bool {
        matches!(self, Self::RemoveCollateral | Self::Borrow)
    }

    /// True when the action changes the rented (borrowed) amount.
    pub fn changes_rent(self) -> bool {
        matches!(self, Self::Borrow | Self::Repay)
    }

    /// Rent delta for moving `amount` base units at the given multiplier.
    ///
    /// Collateral actions never change rent; the multiplier is ignored for them.
    pub fn rent_delta(self, amount: U256, rented_multiplier: U256) -> Result<I256> {
        match self {
            Self::AddCollateral | Self::RemoveCollateral => Ok(I256::ZERO),
            Self::Borrow => borrow_rent(amount, rented_multiplier),
            Self::Repay => repay_rent(amount, rented_multiplier),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AddCollateral => "add_collateral",
            Self::RemoveCollateral => "remove_collateral",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
        };
        f.write_str(name)
    }
}

/// Rent opened by borrowing `amount`: `amount * rentedMultiplier / 1e18`.
pub fn borrow_rent(amount: U256, rented_multiplier: U256) -> Result<I256> {
    let rent = amount
        .checked_mul(rented_multiplier)
        .ok_or_else(|| AppError::NumericOverflow(format!("borrow rent for {amount}")))?
        / WAD;
    to_signed(rent)
}

/// Rent closed by repaying `amount`: `-(amount * 1e18 / rentedMultiplier)`.
pub fn repay_rent(amount: U256, rented_multiplier: U256) -> Result<I256> {
    if rented_multiplier.is_zero() {
        return Err(AppError::Rpc("BAMM reported a zero rentedMultiplier".into()));
    }
    let rent = amount
        .checked_mul(WAD)
        .ok_or_else(|| AppError::NumericOverflow(format!("repay rent for {amount}")))?
        / rented_multiplier;
    Ok(-to_signed(rent)?)
}

fn to_signed(value: U256) -> Result<I256> {
    I256::try_from(value)
        .map_err(|_| AppError::NumericOverflow(format!("{value} exceeds int256 range")))
}

/// Fields of the action record that this server never varies.
///
/// Slippage guards, position closing and permit signatures are not exposed to
/// tools yet; they live here so call sites stay unchanged when they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefaults {
    pub token0_amount_min: U256,
    pub token1_amount_min: U256,
    pub close_position: bool,
    pub approve_max: bool,
    pub v: u8,
    pub r: B256,
    pub s: B256,
    /// Seconds added to the current time to form the deadline.
    pub deadline_secs: u64,
}

impl Default for ActionDefaults {
    fn default() -> Self {
        Self {
            token0_amount_min: U256::ZERO,
            token1_amount_min: U256::ZERO,
            close_position: false,
            approve_max: false,
            v: 0,
            r: B256::ZERO,
            s: B256::ZERO,
            deadline_secs: ACTION_DEADLINE_SECS,
        }
    }
}

/// Builds `IBamm::Action` records.
#[derive(Debug, Clone, Default)]
pub struct ActionBuilder {
    defaults: ActionDefaults,
}

impl ActionBuilder {
    pub fn new(defaults: ActionDefaults) -> Self {
        Self { defaults }
    }

    /// Build the action for `kind` moving `amount` base units of the token on `side`.
    ///
    /// Exactly one of the two asset deltas is non-zero. Its sign follows the
    /// kind: deposits and repayments are positive, withdrawals and borrows
    /// negative.
    pub fn build(
        &self,
        kind: ActionKind,
        side: PoolSide,
        amount: U256,
        rent: I256,
        recipient: Address,
        now: u64,
    ) -> Result<IBamm::Action> {
        let magnitude = to_signed(amount)?;
        let delta = if kind.is_outflow() { -magnitude } else { magnitude };
        let (token0_amount, token1_amount) = match side {
            PoolSide::Asset0 => (delta, I256::ZERO),
            PoolSide::Asset1 => (I256::ZERO, delta),
        };

        Ok(IBamm::Action {
            token0Amount: token0_amount,
            token1Amount: token1_amount,
            rent,
            to: recipient,
            token0AmountMin: self.defaults.token0_amount_min,
            token1AmountMin: self.defaults.token1_amount_min,
            closePosition: self.defaults.close_position,
            approveMax: self.defaults.approve_max,
            v: self.defaults.v,
            r: self.defaults.r,
            s: self.defaults.s,
            deadline: U256::from(now.saturating_add(self.defaults.deadline_secs)),
        })
    }
}
