//! Token symbol resolution against the pools API.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::{
    error::{AppError, Result},
    services::pools_api::{FraxPool, PoolsApi},
    types::TokenRef,
};

/// Find the address of the first pool asset whose symbol matches, ignoring case.
///
/// Pools are scanned in API order, `token0` before `token1` within a pool.
pub fn find_symbol(pools: &[FraxPool], symbol: &str) -> Result<Address> {
    let wanted = symbol.to_lowercase();

    let raw = pools
        .iter()
        .find_map(|pool| {
            if pool.token0_symbol.to_lowercase() == wanted {
                Some(&pool.token0_address)
            } else if pool.token1_symbol.to_lowercase() == wanted {
                Some(&pool.token1_address)
            } else {
                None
            }
        })
        .ok_or_else(|| AppError::ResolutionFailure(symbol.to_string()))?;

    raw.parse::<Address>().map_err(|e| {
        AppError::Parse(format!("Pools API returned invalid address '{}' for {}: {}", raw, symbol, e))
    })
}

/// Resolves [`TokenRef`]s to addresses. Every symbol lookup is a fresh API call.
#[derive(Clone)]
pub struct TokenResolver {
    api: Arc<dyn PoolsApi>,
}

impl TokenResolver {
    pub fn new(api: Arc<dyn PoolsApi>) -> Self {
        Self { api }
    }

    pub async fn resolve(&self, token: &TokenRef) -> Result<Address> {
        match token {
            TokenRef::Address(address) => Ok(*address),
            TokenRef::Symbol(symbol) => {
                let pools = self.api.list_pools().await?;
                let address = find_symbol(&pools, symbol)?;
                tracing::info!(symbol = %symbol, address = %address, "Resolved token symbol");
                Ok(address)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pools_api::tests::StaticPools;
    use alloy::primitives::address;

    fn pool(sym0: &str, addr0: &str, sym1: &str, addr1: &str) -> FraxPool {
        FraxPool {
            token0_symbol: sym0.into(),
            token0_address: addr0.into(),
            token1_symbol: sym1.into(),
            token1_address: addr1.into(),
            ..FraxPool::default()
        }
    }

    fn listing() -> Vec<FraxPool> {
        vec![
            pool(
                "IQT",
                "0x0000000000000000000000000000000000000abc",
                "FRAX",
                "0x00000000000000000000000000000000000000f1",
            ),
            pool(
                "FXS",
                "0x00000000000000000000000000000000000000f2",
                "iqt",
                "0x0000000000000000000000000000000000000def",
            ),
        ]
    }

    #[test]
    fn test_find_symbol_is_case_insensitive() {
        let found = find_symbol(&listing(), "iqt").unwrap();
        assert_eq!(found, address!("0000000000000000000000000000000000000abc"));
    }

    #[test]
    fn test_find_symbol_checks_token1() {
        let found = find_symbol(&listing(), "Frax").unwrap();
        assert_eq!(found, address!("00000000000000000000000000000000000000f1"));
    }

    #[test]
    fn test_find_symbol_first_match_wins() {
        // "IQT" appears as token0 of the first pool and token1 of the second.
        let found = find_symbol(&listing(), "IQT").unwrap();
        assert_eq!(found, address!("0000000000000000000000000000000000000abc"));
    }

    #[test]
    fn test_find_symbol_not_found() {
        let err = find_symbol(&listing(), "WETH").unwrap_err();
        assert!(matches!(err, AppError::ResolutionFailure(s) if s == "WETH"));
    }

    #[test]
    fn test_find_symbol_bad_address() {
        let pools = vec![pool("BAD", "not-an-address", "X", "0x1")];
        assert!(matches!(find_symbol(&pools, "bad").unwrap_err(), AppError::Parse(_)));
    }

    #[tokio::test]
    async fn test_resolve_address_skips_api() {
        let resolver = TokenResolver::new(Arc::new(StaticPools { pools: vec![], unavailable: true }));
        let addr = address!("0000000000000000000000000000000000000001");
        assert_eq!(resolver.resolve(&TokenRef::Address(addr)).await.unwrap(), addr);
    }

    #[tokio::test]
    async fn test_resolve_symbol_via_api() {
        let resolver =
            TokenResolver::new(Arc::new(StaticPools { pools: listing(), unavailable: false }));
        let found = resolver.resolve(&TokenRef::Symbol("fxs".into())).await.unwrap();
        assert_eq!(found, address!("00000000000000000000000000000000000000f2"));
    }

    #[tokio::test]
    async fn test_resolve_symbol_upstream_unavailable() {
        let resolver = TokenResolver::new(Arc::new(StaticPools { pools: listing(), unavailable: true }));
        let err = resolver.resolve(&TokenRef::Symbol("IQT".into())).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }
}
