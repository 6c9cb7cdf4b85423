//! Locked value of every BAMM-backed pool.

use std::{collections::HashMap, sync::Arc};

use alloy::primitives::Address;

use crate::{
    error::Result,
    services::{
        chain::BammReader,
        pools_api::{FraxPool, PoolsApi},
    },
    types::{PoolStats, PoolStatsReport},
};

/// Keep the API records whose pair backs a BAMM, highest TVL first.
///
/// `bamm_by_pair` maps pair address to pool contract. Records with an
/// unparsable address are dropped. The sort is stable, so equal TVLs keep
/// API order.
pub fn select_bamm_pools(
    pools: Vec<FraxPool>,
    bamm_by_pair: &HashMap<Address, Address>,
) -> Vec<PoolStats> {
    let mut selected: Vec<PoolStats> = pools
        .into_iter()
        .filter_map(|pool| {
            let pair = pool.pool_address.parse::<Address>().ok()?;
            let bamm = bamm_by_pair.get(&pair)?;
            Some(PoolStats {
                pool_address: format!("{pair:?}"),
                bamm_address: format!("{bamm:?}"),
                tvl: pool.tvl_or_zero(),
                token0_amount_locked: pool.token0_amount_locked.unwrap_or_default(),
                token1_amount_locked: pool.token1_amount_locked.unwrap_or_default(),
                pool_name: pool.pool_name,
                token0_symbol: pool.token0_symbol,
                token1_symbol: pool.token1_symbol,
                created_at_timestamp: pool.created_at_timestamp,
            })
        })
        .collect();

    selected.sort_by(|a, b| b.tvl.cmp(&a.tvl));
    selected
}

/// Service for the pool statistics listing.
#[derive(Clone)]
pub struct PoolStatsService {
    reader: Arc<dyn BammReader>,
    api: Arc<dyn PoolsApi>,
}

impl PoolStatsService {
    pub fn new(reader: Arc<dyn BammReader>, api: Arc<dyn PoolsApi>) -> Self {
        Self { reader, api }
    }

    pub async fn get_pool_stats(&self, factory: Address) -> Result<PoolStatsReport> {
        tracing::info!(factory = %factory, "Fetching BAMM pool stats");

        let bamms = self.reader.bamms(factory).await?;

        let mut bamm_by_pair = HashMap::with_capacity(bamms.len());
        for bamm in bamms {
            let pair = self.reader.pair(bamm).await?;
            if pair.is_zero() {
                tracing::warn!(bamm = %bamm, "BAMM has no pair, skipping");
                continue;
            }
            bamm_by_pair.insert(pair, bamm);
        }

        let pools = select_bamm_pools(self.api.list_pools().await?, &bamm_by_pair);
        tracing::info!(count = pools.len(), "Fetched BAMM pool stats");

        Ok(PoolStatsReport { total: pools.len(), pools })
    }
}
