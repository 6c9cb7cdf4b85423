//! BAMM MCP Server Library
//!
//! A Model Context Protocol server for Frax BAMM (borrow AMM) pools on Fraxtal.
//!
//! # Features
//!
//! - **Lending**: Lend Fraxswap LP tokens and redeem BAMM shares
//! - **Borrowing**: Add or remove collateral, borrow and repay pool tokens
//! - **Reads**: List the caller's positions and the TVL of every BAMM pool
//!
//! # Example
//!
//! ```rust,ignore
//! use bamm_mcp::{BammServer, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = BammServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use mcp::BammServer;
