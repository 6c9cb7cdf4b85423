//! Token references and unit conversion.

use alloy::primitives::{Address, I256, U256};

use crate::{
    error::{AppError, Result},
    ethereum::constants::WAD_DECIMALS,
};

/// A token named either by contract address or by ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRef {
    /// Contract address, used as-is.
    Address(Address),
    /// Ticker symbol, resolved through the pools API before use.
    Symbol(String),
}

impl TokenRef {
    /// Build a reference from a tool's optional address / optional symbol pair.
    ///
    /// A non-empty symbol takes precedence over the address. Neither given is
    /// [`AppError::InvalidParameters`].
    pub fn from_parts(address: Option<Address>, symbol: Option<&str>) -> Result<Self> {
        match (symbol.map(str::trim).filter(|s| !s.is_empty()), address) {
            (Some(symbol), _) => Ok(Self::Symbol(symbol.to_string())),
            (None, Some(address)) => Ok(Self::Address(address)),
            (None, None) => Err(AppError::InvalidParameters(
                "either a token address or a token symbol is required".into(),
            )),
        }
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Symbol(symbol) => f.write_str(symbol),
        }
    }
}

/// Format a U256 value with decimals to a human-readable string.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 || value.is_zero() {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Format a signed fixed-point value, as stored in BAMM vaults.
pub fn format_signed_units(value: I256, decimals: u8) -> String {
    let magnitude = format_units(value.unsigned_abs(), decimals);
    if value.is_negative() {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Parse a human-readable amount string to U256 with decimals.
///
/// Digits beyond `decimals` are truncated, never rounded.
pub fn parse_units(amount: &str, decimals: u8) -> std::result::Result<U256, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if amount.starts_with('-') {
        return Err("Amount cannot be negative".to_string());
    }

    let (integer, fraction) = match amount.split_once('.') {
        Some((_, rest)) if rest.contains('.') => {
            return Err("Invalid amount format".to_string());
        }
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return Err("Invalid amount format".to_string());
    }
    if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(format!("Invalid amount: {}", amount));
    }

    let decimals = decimals as usize;
    let mut fraction = fraction.to_string();
    fraction.truncate(decimals);
    fraction.push_str(&"0".repeat(decimals - fraction.len()));

    let integer_value = if integer.is_empty() {
        U256::ZERO
    } else {
        integer.parse::<U256>().map_err(|e| format!("Invalid integer part: {}", e))?
    };
    let fraction_value = if fraction.is_empty() {
        U256::ZERO
    } else {
        fraction.parse::<U256>().map_err(|e| format!("Invalid fraction part: {}", e))?
    };

    let scale = U256::from(10u64).pow(U256::from(decimals));
    integer_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Convert a human-readable amount to 18-decimal base units.
///
/// Every BAMM tool assumes 18-decimal tokens; amounts for tokens with other
/// decimals are scaled incorrectly. Zero is rejected.
pub fn parse_wad(amount: &str) -> Result<U256> {
    let value = parse_units(amount, WAD_DECIMALS)
        .map_err(|e| AppError::InvalidParameters(format!("amount '{}': {}", amount, e)))?;
    if value.is_zero() {
        return Err(AppError::InvalidParameters("Amount must be greater than zero".into()));
    }
    Ok(value)
}
