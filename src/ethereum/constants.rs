//! Network and protocol constants.

use alloy::primitives::U256;

/// Fraxtal mainnet chain ID.
pub const FRAXTAL_CHAIN_ID: u64 = 252;

/// Decimals assumed for every token moved through a BAMM pool.
pub const WAD_DECIMALS: u8 = 18;

/// 1e18, the fixed-point unit of `rentedMultiplier`.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Lifetime of an action, enforced on-chain through its `deadline` field.
pub const ACTION_DEADLINE_SECS: u64 = 300;
