//! Positions of the acting account across all BAMM pools.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::{
    error::Result,
    ethereum::constants::WAD_DECIMALS,
    services::{
        chain::{BammReader, VaultBalances},
        pools_api::{FraxPool, PoolsApi},
    },
    types::{format_signed_units, PositionView, PositionsReport},
};

/// Raw position in one pool, joined with API metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BammPosition {
    pub bamm: Address,
    pub pair: Address,
    pub vault: VaultBalances,
    pub pool_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
}

impl BammPosition {
    /// Join on-chain state with the first API record for the pair, if any.
    pub fn with_metadata(
        bamm: Address,
        pair: Address,
        vault: VaultBalances,
        records: &[FraxPool],
    ) -> Self {
        let (pool_name, token0_symbol, token1_symbol) = match records.first() {
            Some(r) => (r.pool_name.clone(), r.token0_symbol.clone(), r.token1_symbol.clone()),
            None => {
                tracing::warn!(bamm = %bamm, pair = %pair, "No pool metadata for pair");
                Default::default()
            }
        };

        Self { bamm, pair, vault, pool_name, token0_symbol, token1_symbol }
    }

    fn view(&self) -> PositionView {
        PositionView {
            bamm_address: format!("{:?}", self.bamm),
            pair_address: format!("{:?}", self.pair),
            pool_name: self.pool_name.clone(),
            token0_symbol: self.token0_symbol.clone(),
            token1_symbol: self.token1_symbol.clone(),
            token0_balance: format_signed_units(self.vault.token0, WAD_DECIMALS),
            token1_balance: format_signed_units(self.vault.token1, WAD_DECIMALS),
            rented: format_signed_units(self.vault.rented, WAD_DECIMALS),
        }
    }
}

/// Report of positions holding a non-zero balance of either asset.
pub fn format_positions(account: Address, positions: &[BammPosition]) -> PositionsReport {
    let positions: Vec<PositionView> =
        positions.iter().filter(|p| !p.vault.is_empty()).map(BammPosition::view).collect();

    PositionsReport { account: format!("{account:?}"), total: positions.len(), positions }
}

/// Service for reading an account's BAMM positions.
#[derive(Clone)]
pub struct PositionsService {
    reader: Arc<dyn BammReader>,
    api: Arc<dyn PoolsApi>,
}

impl PositionsService {
    pub fn new(reader: Arc<dyn BammReader>, api: Arc<dyn PoolsApi>) -> Self {
        Self { reader, api }
    }

    /// Positions in every factory pool where `account` is a registered user.
    ///
    /// Pools the account never touched are skipped. Empty vaults are kept;
    /// [`format_positions`] drops them.
    pub async fn get_positions(
        &self,
        factory: Address,
        account: Address,
    ) -> Result<Vec<BammPosition>> {
        tracing::info!(factory = %factory, account = %account, "Fetching BAMM positions");

        let bamms = self.reader.bamms(factory).await?;

        let mut positions = Vec::new();
        for bamm in bamms {
            if !self.reader.is_user(bamm, account).await? {
                continue;
            }

            let vault = self.reader.user_vault(bamm, account).await?;
            let pair = self.reader.pair(bamm).await?;
            let records = self.api.pools_for_pair(pair).await?;

            positions.push(BammPosition::with_metadata(bamm, pair, vault, &records));
        }

        tracing::info!(account = %account, count = positions.len(), "Fetched BAMM positions");
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::{chain::tests::FakeChain, pools_api::tests::StaticPools},
    };
    use alloy::primitives::{address, I256, U256};

    const ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    fn wad(n: u64) -> I256 {
        I256::from_raw(U256::from(n) * U256::from(1_000_000_000_000_000_000u64))
    }

    fn position(bamm_byte: u8, token0: I256, token1: I256) -> BammPosition {
        BammPosition {
            bamm: Address::repeat_byte(bamm_byte),
            pair: Address::repeat_byte(bamm_byte + 1),
            vault: VaultBalances { token0, token1, rented: I256::ZERO },
            pool_name: "IQT/FRAX".into(),
            token0_symbol: "IQT".into(),
            token1_symbol: "FRAX".into(),
        }
    }

    #[test]
    fn test_with_metadata_uses_first_record() {
        let records = vec![
            FraxPool {
                pool_name: "IQT/FRAX".into(),
                token0_symbol: "IQT".into(),
                token1_symbol: "FRAX".into(),
                ..FraxPool::default()
            },
            FraxPool { pool_name: "ignored".into(), ..FraxPool::default() },
        ];
        let pos = BammPosition::with_metadata(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            VaultBalances::default(),
            &records,
        );
        assert_eq!(pos.pool_name, "IQT/FRAX");
        assert_eq!(pos.token1_symbol, "FRAX");
    }

    #[test]
    fn test_with_metadata_without_record() {
        let pos = BammPosition::with_metadata(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            VaultBalances::default(),
            &[],
        );
        assert!(pos.pool_name.is_empty());
        assert!(pos.token0_symbol.is_empty());
    }

    #[test]
    fn test_format_positions_drops_empty_vaults() {
        let raw = vec![
            position(0x10, wad(5), I256::ZERO),
            position(0x20, I256::ZERO, I256::ZERO),
            position(0x30, I256::ZERO, -wad(2)),
        ];

        let report = format_positions(ACCOUNT, &raw);
        assert_eq!(raw.len(), 3);
        assert_eq!(report.total, 2);
        assert_eq!(report.positions[0].token0_balance, "5");
        assert_eq!(report.positions[1].token1_balance, "-2");
    }

    #[test]
    fn test_format_positions_empty() {
        let report = format_positions(ACCOUNT, &[]);
        assert_eq!(report.total, 0);
        assert!(report.positions.is_empty());
    }

    #[tokio::test]
    async fn test_get_positions_skips_unregistered_pools() {
        let b1 = Address::repeat_byte(0xb1);
        let b2 = Address::repeat_byte(0xb2);
        let b3 = Address::repeat_byte(0xb3);
        let mut chain = FakeChain::new();
        chain.bamms = vec![b1, b2, b3];
        chain.pairs.insert(b3, Address::repeat_byte(0xc3));
        chain.vaults.insert(b1, VaultBalances::default());
        chain.vaults.insert(b3, VaultBalances { token0: wad(4), ..VaultBalances::default() });

        let listing = vec![FraxPool {
            pool_address: format!("{:?}", Address::repeat_byte(0xc3)),
            pool_name: "IQT/FRAX".into(),
            ..FraxPool::default()
        }];
        let api = StaticPools { pools: listing, unavailable: false };
        let service = PositionsService::new(Arc::new(chain), Arc::new(api));

        let positions = service.get_positions(Address::repeat_byte(0xfa), ACCOUNT).await.unwrap();
        let bamms: Vec<Address> = positions.iter().map(|p| p.bamm).collect();
        assert_eq!(bamms, vec![b1, b3]);
        assert!(positions[0].pool_name.is_empty());
        assert_eq!(positions[1].pool_name, "IQT/FRAX");

        let report = format_positions(ACCOUNT, &positions);
        assert_eq!(report.total, 1);
        assert_eq!(report.positions[0].token0_balance, "4");
    }

    #[tokio::test]
    async fn test_get_positions_propagates_upstream_failure() {
        let mut chain = FakeChain::new();
        chain.bamms = vec![Address::repeat_byte(0xb1)];
        chain.vaults.insert(Address::repeat_byte(0xb1), VaultBalances::default());

        let api = StaticPools { pools: vec![], unavailable: true };
        let service = PositionsService::new(Arc::new(chain), Arc::new(api));

        let err = service.get_positions(Address::repeat_byte(0xfa), ACCOUNT).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }
}
