//! Business logic services module.

pub mod bamm;
pub mod chain;
pub mod pool_stats;
pub mod pools_api;
pub mod position_validator;
pub mod positions;
pub mod token_guard;
pub mod token_resolver;

pub use bamm::{BammAccount, BammService};
pub use chain::{BammReader, BammWriter, OnChainReader, OnChainWriter, VaultBalances};
pub use pool_stats::PoolStatsService;
pub use pools_api::{FraxPool, FraxPoolsApi, PoolsApi};
pub use position_validator::PositionValidator;
pub use positions::{format_positions, BammPosition, PositionsService};
pub use token_guard::{Erc20Ledger, TokenGuard, TokenLedger};
pub use token_resolver::TokenResolver;
