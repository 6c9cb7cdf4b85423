//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod action;
pub mod results;
pub mod token;

pub use action::*;
pub use results::*;
pub use token::*;
