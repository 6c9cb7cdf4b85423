//! Client for the Frax pools API.
//!
//! The API lists Fraxswap pairs with their token symbols, addresses and
//! locked value. It is used to resolve symbols and to decorate on-chain
//! BAMM state with human-readable names.

use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// One pool record as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FraxPool {
    /// Fraxswap pair address.
    #[serde(deserialize_with = "null_as_default")]
    pub pool_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pool_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token0_symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token1_symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token0_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token1_address: String,
    pub token0_amount_locked: Option<Decimal>,
    pub token1_amount_locked: Option<Decimal>,
    /// Total value locked, in USD.
    pub tvl: Option<Decimal>,
    pub created_at_timestamp: Option<serde_json::Value>,
}

impl FraxPool {
    /// TVL with missing values treated as zero.
    pub fn tvl_or_zero(&self) -> Decimal {
        self.tvl.unwrap_or(Decimal::ZERO)
    }
}

/// The API sends `null` for unknown names and symbols; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope shared by both endpoints.
#[derive(Debug, Deserialize)]
struct PoolsResponse {
    pools: Vec<FraxPool>,
}

/// Read access to the pools listing.
///
/// Abstracted so services can run against an in-memory listing in tests.
#[async_trait]
pub trait PoolsApi: Send + Sync {
    /// Every pool the API knows about.
    async fn list_pools(&self) -> Result<Vec<FraxPool>>;

    /// Pools whose pair address is `pair` (normally zero or one record).
    async fn pools_for_pair(&self, pair: Address) -> Result<Vec<FraxPool>>;
}

/// HTTP implementation over `reqwest`. No caching: each call is a fresh request.
#[derive(Debug, Clone)]
pub struct FraxPoolsApi {
    client: reqwest::Client,
    base_url: String,
}

impl FraxPoolsApi {
    /// Create a client for the listing at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// URL of the per-pair endpoint.
    fn pair_url(&self, pair: Address) -> String {
        format!("{}/{}", self.base_url, pair)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<FraxPool>> {
        tracing::debug!(url, "Fetching pools");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Failed to fetch pools: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "Pools API returned status: {}",
                response.status()
            )));
        }

        let body: PoolsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse pools response: {}", e)))?;

        tracing::debug!(url, count = body.pools.len(), "Fetched pools");
        Ok(body.pools)
    }
}

#[async_trait]
impl PoolsApi for FraxPoolsApi {
    async fn list_pools(&self) -> Result<Vec<FraxPool>> {
        self.fetch(&self.base_url).await
    }

    async fn pools_for_pair(&self, pair: Address) -> Result<Vec<FraxPool>> {
        self.fetch(&self.pair_url(pair)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::collections::HashMap;

    /// In-memory listing keyed by lower-cased pair address.
    #[derive(Default)]
    pub(crate) struct StaticPools {
        pub pools: Vec<FraxPool>,
        pub unavailable: bool,
    }

    #[async_trait]
    impl PoolsApi for StaticPools {
        async fn list_pools(&self) -> Result<Vec<FraxPool>> {
            if self.unavailable {
                return Err(AppError::UpstreamUnavailable("Pools API returned status: 503".into()));
            }
            Ok(self.pools.clone())
        }

        async fn pools_for_pair(&self, pair: Address) -> Result<Vec<FraxPool>> {
            if self.unavailable {
                return Err(AppError::UpstreamUnavailable("Pools API returned status: 503".into()));
            }
            let by_pair: HashMap<String, &FraxPool> =
                self.pools.iter().map(|p| (p.pool_address.to_lowercase(), p)).collect();
            let key = format!("{pair:?}").to_lowercase();
            Ok(by_pair.get(&key).map(|p| vec![(*p).clone()]).unwrap_or_default())
        }
    }

    #[test]
    fn test_parse_api_payload() {
        let json = r#"{
            "pools": [{
                "poolAddress": "0x0000000000000000000000000000000000000abc",
                "poolName": "IQT/FRAX",
                "token0Symbol": "IQT",
                "token1Symbol": "FRAX",
                "token0Address": "0x00000000000000000000000000000000000000a0",
                "token1Address": "0x00000000000000000000000000000000000000a1",
                "token0AmountLocked": 1500.25,
                "token1AmountLocked": 300,
                "tvl": 12345,
                "createdAtTimestamp": "2024-03-01T00:00:00Z",
                "fraxswapApr": 4.2
            }]
        }"#;

        let parsed: PoolsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.pools.len(), 1);

        let pool = &parsed.pools[0];
        assert_eq!(pool.token0_symbol, "IQT");
        assert_eq!(pool.pool_name, "IQT/FRAX");
        assert_eq!(pool.tvl, Some(Decimal::from(12345)));
        assert!(pool.token0_amount_locked.is_some());
        assert_eq!(pool.token1_amount_locked, Some(Decimal::from(300)));
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"pools": [{"poolAddress": "0x1", "tvl": null}]}"#;
        let parsed: PoolsResponse = serde_json::from_str(json).unwrap();
        let pool = &parsed.pools[0];
        assert!(pool.token0_symbol.is_empty());
        assert_eq!(pool.tvl_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_null_strings_do_not_fail_the_listing() {
        let json = r#"{"pools": [
            {"poolAddress": "0x1", "token0Symbol": null, "poolName": null, "tvl": 5},
            {"poolAddress": "0x2", "token0Symbol": "FRAX", "token1Address": null}
        ]}"#;
        let parsed: PoolsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.pools.len(), 2);
        assert!(parsed.pools[0].token0_symbol.is_empty());
        assert!(parsed.pools[0].pool_name.is_empty());
        assert_eq!(parsed.pools[0].tvl, Some(Decimal::from(5)));
        assert_eq!(parsed.pools[1].token0_symbol, "FRAX");
        assert!(parsed.pools[1].token1_address.is_empty());
    }

    #[test]
    fn test_pair_url() {
        let api = FraxPoolsApi::new("https://api.example.com/pools/").unwrap();
        let pair = address!("0000000000000000000000000000000000000abc");
        assert_eq!(
            api.pair_url(pair).to_lowercase(),
            "https://api.example.com/pools/0x0000000000000000000000000000000000000abc"
        );
    }

    #[tokio::test]
    async fn test_static_pools_lookup_by_pair() {
        let api = StaticPools {
            pools: vec![FraxPool {
                pool_address: "0x0000000000000000000000000000000000000ABC".into(),
                pool_name: "A/B".into(),
                ..FraxPool::default()
            }],
            unavailable: false,
        };
        let pair = address!("0000000000000000000000000000000000000abc");
        let found = api.pools_for_pair(pair).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pool_name, "A/B");
    }
}
