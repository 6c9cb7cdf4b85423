//! Smart contract bindings.

pub mod bamm;
pub mod erc20;

pub use bamm::{IBamm, IBammFactory};
pub use erc20::IERC20;
