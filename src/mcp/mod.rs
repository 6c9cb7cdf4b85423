//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::BammServer;
pub use server::{parse_address, token_ref, BorrowInput, CollateralInput, PoolAmountInput};
