//! Live listing feed backed by the aggregator's token-list API.

use crate::error::DataError;
use crate::sources::{LiveFeed, LiveListings};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mooner_domain::{ListingCategory, ListingEntry, SourceOrigin};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the live feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    /// Activity window requested for every category.
    pub timeframe: String,
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://datapi.jup.ag/v1".to_string(),
            timeframe: "24h".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryArgs<'a> {
    timeframe: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GemsRequest<'a> {
    recent: CategoryArgs<'a>,
    about_to_graduate: CategoryArgs<'a>,
    graduated: CategoryArgs<'a>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GemsResponse {
    recent: Option<CategoryPools>,
    about_to_graduate: Option<CategoryPools>,
    graduated: Option<CategoryPools>,
}

/// Response of the pool-by-asset lookup.
#[derive(Debug, Deserialize)]
struct PoolsResponse {
    #[serde(default)]
    pools: Vec<JupiterPool>,
}

#[derive(Debug, Deserialize)]
struct CategoryPools {
    #[serde(default)]
    pools: Vec<JupiterPool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterPool {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub bonding_curve: Option<f64>,
    pub volume_24h: Option<f64>,
    pub liquidity: Option<f64>,
    pub base_asset: JupiterAsset,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterAsset {
    pub id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub icon: Option<String>,
    pub holder_count: Option<u64>,
    pub mcap: Option<f64>,
    pub usd_price: Option<f64>,
    pub liquidity: Option<f64>,
    pub graduated_at: Option<DateTime<Utc>>,
    pub graduated_pool: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

fn decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(|v| Decimal::try_from(v).ok())
}

impl JupiterPool {
    pub fn to_listing_entry(&self) -> ListingEntry {
        let asset = &self.base_asset;
        let mut entry = ListingEntry::new(asset.id.clone(), self.id.clone(), SourceOrigin::LiveFeed);
        if let Some(name) = &asset.name {
            entry.name = name.clone();
        }
        if let Some(symbol) = &asset.symbol {
            entry.symbol = symbol.clone();
        }
        entry.icon = asset.icon.clone();
        entry.price_usd = decimal(asset.usd_price);
        entry.market_cap_usd = decimal(asset.mcap);
        entry.volume_24h = decimal(self.volume_24h);
        entry.liquidity = decimal(asset.liquidity.or(self.liquidity));
        entry.holder_count = asset.holder_count;
        entry.bonding_curve_pct = decimal(self.bonding_curve);
        entry.created_at = self.created_at;
        entry.graduated_at = asset.graduated_at;
        entry.graduated_pool = asset.graduated_pool.clone();
        entry.is_migrated = asset.graduated_pool.is_some() || asset.graduated_at.is_some();
        entry.twitter = asset.twitter.clone();
        entry.telegram = asset.telegram.clone();
        entry.website = asset.website.clone();
        entry
    }
}

impl GemsResponse {
    fn into_listings(self) -> LiveListings {
        let convert = |pools: CategoryPools| {
            pools
                .pools
                .iter()
                .map(JupiterPool::to_listing_entry)
                .collect::<Vec<_>>()
        };
        let mut listings = LiveListings::default();
        for (category, pools) in [
            (ListingCategory::New, self.recent),
            (ListingCategory::AboutToGraduate, self.about_to_graduate),
            (ListingCategory::Graduated, self.graduated),
        ] {
            if let Some(pools) = pools {
                listings = listings.with_category(category, convert(pools));
            }
        }
        listings
    }
}

/// Live feed client.
pub struct JupiterFeed {
    client: Client,
    config: FeedConfig,
}

impl JupiterFeed {
    /// Creates a feed client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FeedConfig) -> Result<Self, DataError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn gems_url(&self) -> String {
        format!("{}/pools/gems", self.config.base_url.trim_end_matches('/'))
    }

    fn pools_url(&self) -> String {
        format!("{}/pools", self.config.base_url.trim_end_matches('/'))
    }

    /// The feed's pool for one asset, used for graduated tokens. `None` when
    /// the lookup fails or finds nothing.
    pub async fn pool_by_asset(&self, asset_id: &str) -> Option<JupiterPool> {
        match self.fetch_pools_by_asset(asset_id).await {
            Ok(pools) => pools.into_iter().next(),
            Err(e) => {
                warn!(asset = asset_id, error = %e, "Pool lookup by asset failed");
                None
            }
        }
    }

    async fn fetch_pools_by_asset(&self, asset_id: &str) -> Result<Vec<JupiterPool>, DataError> {
        let url = self.pools_url();
        let response = self
            .client
            .get(&url)
            .query(&[("assetIds", asset_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(DataError::Status { status, url });
        }
        let text = response.text().await?;
        let parsed: PoolsResponse = serde_json::from_str(&text).map_err(|e| DataError::Decode {
            what: "pools by asset response",
            reason: e.to_string(),
        })?;
        Ok(parsed.pools)
    }
}

#[async_trait]
impl LiveFeed for JupiterFeed {
    async fn fetch(&self) -> Result<LiveListings, DataError> {
        let url = self.gems_url();
        let args = || CategoryArgs {
            timeframe: &self.config.timeframe,
        };
        let body = GemsRequest {
            recent: args(),
            about_to_graduate: args(),
            graduated: args(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(url = %url, status, "Live feed request failed");
            return Err(DataError::Status { status, url });
        }

        let text = response.text().await?;
        let parsed: GemsResponse = serde_json::from_str(&text).map_err(|e| DataError::Decode {
            what: "live feed response",
            reason: e.to_string(),
        })?;
        let listings = parsed.into_listings();
        debug!(rows = listings.all_entries().count(), "Fetched live feed");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "recent": {"pools": [{
            "id": "pool-1",
            "createdAt": "2025-05-01T10:00:00Z",
            "bondingCurve": 12.5,
            "volume24h": 1000.0,
            "baseAsset": {
                "id": "mint-1",
                "name": "Moon",
                "symbol": "MOON",
                "holderCount": 12,
                "usdPrice": 0.5,
                "mcap": 500000.0
            }
        }]},
        "graduated": {"pools": [{
            "id": "pool-2",
            "baseAsset": {
                "id": "mint-2",
                "graduatedPool": "damm-2",
                "graduatedAt": "2025-05-02T10:00:00Z"
            }
        }]}
    }"#;

    #[test]
    fn test_response_to_listings() {
        let response: GemsResponse = serde_json::from_str(SAMPLE).unwrap();
        let listings = response.into_listings();

        let recent = listings.get(ListingCategory::New).unwrap();
        assert_eq!(recent.len(), 1);
        let entry = &recent[0];
        assert_eq!(entry.token_id, "mint-1");
        assert_eq!(entry.pool_id, "pool-1");
        assert_eq!(entry.source, SourceOrigin::LiveFeed);
        assert_eq!(entry.price_usd, Some(dec!(0.5)));
        assert_eq!(entry.bonding_curve_pct, Some(dec!(12.5)));
        assert_eq!(entry.holder_count, Some(12));
        assert!(!entry.is_migrated);

        assert!(listings.get(ListingCategory::AboutToGraduate).is_none());

        let graduated = listings.get(ListingCategory::Graduated).unwrap();
        assert!(graduated[0].is_migrated);
        assert_eq!(graduated[0].name, "Unknown");
        assert_eq!(graduated[0].graduated_pool.as_deref(), Some("damm-2"));
    }

    #[test]
    fn test_request_body_shape() {
        let args = || CategoryArgs { timeframe: "24h" };
        let body = serde_json::to_value(GemsRequest {
            recent: args(),
            about_to_graduate: args(),
            graduated: args(),
        })
        .unwrap();
        assert_eq!(body["aboutToGraduate"]["timeframe"], "24h");
    }

    #[test]
    fn test_pools_by_asset_decode() {
        let parsed: PoolsResponse = serde_json::from_str(
            r#"{"pools": [{
                "id": "damm-1",
                "chain": "solana",
                "dex": "met-damm-v2",
                "type": "damm-v2",
                "quoteAsset": "So11111111111111111111111111111111111111112",
                "createdAt": "2025-05-02T10:00:00Z",
                "liquidity": 8400.0,
                "volume24h": 15000.0,
                "updatedAt": "2025-05-03T10:00:00Z",
                "baseAsset": {"id": "mint-2", "symbol": "MOON", "usdPrice": 0.0042}
            }], "total": 1}"#,
        )
        .unwrap();

        let entry = parsed.pools[0].to_listing_entry();
        assert_eq!(entry.pool_id, "damm-1");
        assert_eq!(entry.liquidity, Some(dec!(8400)));
        assert_eq!(entry.volume_24h, Some(dec!(15000)));
    }

    #[test]
    fn test_gems_url() {
        let feed = JupiterFeed::new(FeedConfig {
            base_url: "https://example.com/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(feed.gems_url(), "https://example.com/v1/pools/gems");
    }
}
