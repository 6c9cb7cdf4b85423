//! Checks that a token is one of a BAMM pool's two assets.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::{
    error::{AppError, Result},
    services::chain::BammReader,
    types::PoolSide,
};

/// Which side of the pool `token` is on.
///
/// Addresses compare as raw bytes, so checksum casing never matters.
pub fn side_of(bamm: Address, token: Address, token0: Address, token1: Address) -> Result<PoolSide> {
    if token == token0 {
        Ok(PoolSide::Asset0)
    } else if token == token1 {
        Ok(PoolSide::Asset1)
    } else {
        Err(AppError::TokenMismatch { token, bamm })
    }
}

/// Reads a pool's assets and matches a candidate token against them.
#[derive(Clone)]
pub struct PositionValidator {
    reader: Arc<dyn BammReader>,
}

impl PositionValidator {
    pub fn new(reader: Arc<dyn BammReader>) -> Self {
        Self { reader }
    }

    pub async fn validate(&self, bamm: Address, token: Address) -> Result<PoolSide> {
        let (token0, token1) = self.reader.assets(bamm).await?;

        let side = side_of(bamm, token, token0, token1)?;
        tracing::debug!(bamm = %bamm, token = %token, side = ?side, "Token matched pool side");
        Ok(side)
    }
}
