//! Error types and handling module.
//!
//! Every failure a tool can hit is one variant of [`AppError`]; tools map it
//! onto an MCP error at the boundary without re-wrapping the message.

use alloy::primitives::{Address, U256};
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No private key was supplied for an operation that needs an account.
    #[error("Missing credential: WALLET_PRIVATE_KEY environment variable is not set")]
    MissingCredential,

    /// Tool input that is structurally valid JSON but semantically unusable.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric overflow in fixed-point arithmetic.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// A token symbol could not be mapped to an address.
    #[error("Resolution failure: token address with symbol {0} not found")]
    ResolutionFailure(String),

    /// The token is neither asset of the BAMM pool.
    #[error("Token {token} does not match token0 or token1 of BAMM {bamm}")]
    TokenMismatch { token: Address, bamm: Address },

    /// The acting account holds less than the operation moves.
    #[error("Insufficient balance of {token}: required {required}, available {available}")]
    InsufficientBalance { token: Address, required: U256, available: U256 },

    /// The call reverted during simulation; nothing was broadcast.
    #[error("Simulation reverted: {0}")]
    SimulationReverted(String),

    /// Broadcasting failed or the mined transaction reverted.
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// The external pools API could not be reached or answered with an error.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::Rpc(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidParameters(_)
            | AppError::InvalidAddress(_)
            | AppError::Parse(_)
            | AppError::NumericOverflow(_)
            | AppError::ResolutionFailure(_)
            | AppError::TokenMismatch { .. } => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) | AppError::MissingCredential => {
                McpError::invalid_request(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
