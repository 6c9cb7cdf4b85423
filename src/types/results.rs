//! Tool response types.

use alloy::primitives::{Address, TxHash, U256};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    ethereum::constants::WAD_DECIMALS,
    types::{format_units, PoolSide},
};

/// Outcome of a confirmed write operation.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResult {
    /// Operation name (e.g. "borrow").
    pub operation: String,
    pub bamm_address: String,
    /// Symbol as supplied by the caller, when the token was named by symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    /// Token moved by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_side: Option<PoolSide>,
    /// Human-readable amount (18 decimals).
    pub amount: String,
    /// Amount in base units.
    pub amount_raw: String,
    pub tx_hash: String,
}

impl TransactionResult {
    pub(crate) fn new(operation: &str, bamm: Address, amount: U256, tx_hash: TxHash) -> Self {
        Self {
            operation: operation.to_string(),
            bamm_address: format!("{bamm:?}"),
            token_symbol: None,
            token_address: None,
            pool_side: None,
            amount: format_units(amount, WAD_DECIMALS),
            amount_raw: amount.to_string(),
            tx_hash: format!("{tx_hash:?}"),
        }
    }

    pub(crate) fn with_token(mut self, symbol: Option<String>, address: Address) -> Self {
        self.token_symbol = symbol;
        self.token_address = Some(format!("{address:?}"));
        self
    }

    pub(crate) fn with_side(mut self, side: PoolSide) -> Self {
        self.pool_side = Some(side);
        self
    }
}

/// One BAMM position, formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct PositionView {
    pub bamm_address: String,
    pub pair_address: String,
    pub pool_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub token0_balance: String,
    pub token1_balance: String,
    pub rented: String,
}

/// Active positions of the acting account.
#[derive(Debug, Clone, Serialize)]
pub struct PositionsReport {
    pub account: String,
    pub total: usize,
    pub positions: Vec<PositionView>,
}

/// A BAMM-backed pool with its locked value.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Fraxswap pair address.
    pub pool_address: String,
    pub bamm_address: String,
    pub pool_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub token0_amount_locked: Decimal,
    pub token1_amount_locked: Decimal,
    /// Total value locked, in USD.
    pub tvl: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_timestamp: Option<serde_json::Value>,
}

/// All BAMM pools, highest TVL first.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatsReport {
    pub total: usize,
    pub pools: Vec<PoolStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, B256};

    #[test]
    fn test_transaction_result_serialization() {
        let bamm = address!("00000000000000000000000000000000000000b0");
        let token = address!("00000000000000000000000000000000000000a0");
        let amount = U256::from(2_500_000_000_000_000_000u64);

        let result = TransactionResult::new("borrow", bamm, amount, B256::repeat_byte(0xab))
            .with_token(Some("IQT".into()), token)
            .with_side(PoolSide::Asset1);
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();

        assert_eq!(json["operation"], "borrow");
        assert_eq!(json["amount"], "2.5");
        assert_eq!(json["amount_raw"], "2500000000000000000");
        assert_eq!(json["token_symbol"], "IQT");
        assert_eq!(json["pool_side"], "asset1");
        assert!(json["tx_hash"].as_str().unwrap().starts_with("0xabab"));
    }

    #[test]
    fn test_transaction_result_omits_missing_token() {
        let bamm = address!("00000000000000000000000000000000000000b0");
        let result = TransactionResult::new("lend", bamm, U256::from(1u64), B256::ZERO);
        let json = serde_json::to_string(&result).unwrap();

        assert!(!json.contains("token_symbol"));
        assert!(!json.contains("pool_side"));
    }
}
