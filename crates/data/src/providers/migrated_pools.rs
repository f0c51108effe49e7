//! Pool data and trading metrics for graduated tokens, read from the
//! constant-product venue's public API.
//!
//! Like the flywheel client this is display data: every lookup degrades to
//! `None` and logs instead of failing the caller.

use crate::error::DataError;
use crate::providers::jupiter::{JupiterFeed, JupiterPool};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct MigratedPoolConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MigratedPoolConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dammv2-api.meteora.ag".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Pool as reported by the venue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MigratedPool {
    pub pool_address: String,
    pub creator: String,
    pub pool_name: String,
    pub token_a_mint: String,
    pub token_a_symbol: String,
    pub token_a_amount: Decimal,
    pub token_a_amount_usd: Decimal,
    pub token_b_mint: String,
    pub token_b_symbol: String,
    pub token_b_amount: Decimal,
    pub token_b_amount_usd: Decimal,
    pub pool_price: Decimal,
    pub tvl: Decimal,
    pub volume24h: Decimal,
    pub fee24h: Decimal,
    pub apr: Decimal,
    /// Raw liquidity, a u128 the API sends as a string.
    pub liquidity: String,
    pub created_at_slot: u64,
    pub created_at_slot_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MigratedPoolMetrics {
    pub pool_address: String,
    pub tvl: Decimal,
    pub volume24h: Decimal,
    pub volume7d: Decimal,
    pub volume30d: Decimal,
    pub lp_fee24h: Decimal,
    pub lp_fee7d: Decimal,
    pub lp_fee30d: Decimal,
    pub partner_fee24h: Decimal,
    pub partner_fee7d: Decimal,
    pub partner_fee30d: Decimal,
    pub protocol_fee24h: Decimal,
    pub protocol_fee7d: Decimal,
    pub protocol_fee30d: Decimal,
    pub apr: Decimal,
    pub fee_tvl_ratio: Decimal,
}

impl MigratedPoolMetrics {
    /// LP, partner and protocol fees over the last 24 hours.
    pub fn total_fee24h(&self) -> Decimal {
        self.lp_fee24h + self.partner_fee24h + self.protocol_fee24h
    }
}

/// A pool with whatever extra data could be fetched for it.
#[derive(Debug, Clone)]
pub struct MigratedPoolDetails {
    pub pool: MigratedPool,
    pub metrics: Option<MigratedPoolMetrics>,
    pub feed_pool: Option<JupiterPool>,
}

pub struct MigratedPoolClient {
    client: Client,
    base_url: String,
}

impl MigratedPoolClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: MigratedPoolConfig) -> Result<Self, DataError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn pool_url(&self, pool_address: &str) -> String {
        format!("{}/pools/{}", self.base_url, pool_address)
    }

    pub async fn pool(&self, pool_address: &str) -> Option<MigratedPool> {
        match self.get_data(&self.pool_url(pool_address)).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(pool = pool_address, error = %e, "Failed to fetch migrated pool");
                None
            }
        }
    }

    pub async fn metrics(&self, pool_address: &str) -> Option<MigratedPoolMetrics> {
        let url = format!("{}/metrics", self.pool_url(pool_address));
        match self.get_data(&url).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(pool = pool_address, error = %e, "Failed to fetch migrated pool metrics");
                None
            }
        }
    }

    /// Pool and metrics fetched together, plus the feed's pool for the base
    /// asset. `base_mint` defaults to the pool's token A. `None` only when the
    /// pool itself is unavailable.
    pub async fn details(
        &self,
        feed: &JupiterFeed,
        pool_address: &str,
        base_mint: Option<&str>,
    ) -> Option<MigratedPoolDetails> {
        let (pool, metrics) = tokio::join!(self.pool(pool_address), self.metrics(pool_address));
        let pool = pool?;

        let asset_id = base_mint.unwrap_or(pool.token_a_mint.as_str());
        let feed_pool = feed.pool_by_asset(asset_id).await;
        debug!(
            pool = pool_address,
            has_metrics = metrics.is_some(),
            has_feed_pool = feed_pool.is_some(),
            "Fetched migrated pool details"
        );

        Some(MigratedPoolDetails {
            pool,
            metrics,
            feed_pool,
        })
    }

    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, DataError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(DataError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        decode_envelope(&body)
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>, DataError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| DataError::Decode {
            what: "migrated pool response",
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::jupiter::FeedConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pool_decode() {
        let pool: Option<MigratedPool> = decode_envelope(
            r#"{"status": 200, "data": {
                "pool_address": "pool-1", "creator": "creator-1", "pool_name": "MOON-SOL",
                "token_a_mint": "mint-a", "token_a_symbol": "MOON",
                "token_a_amount": 1000000.5, "token_a_amount_usd": 4200.25,
                "token_b_mint": "So11111111111111111111111111111111111111112",
                "token_b_symbol": "SOL", "token_b_amount": 21.0, "token_b_amount_usd": 4200.0,
                "pool_price": 0.0042, "tvl": 8400.25, "volume24h": 15000.0,
                "fee24h": 37.5, "apr": 162.9, "liquidity": "340282366920938463463374607431768211455",
                "created_at_slot": 350000000, "created_at_slot_timestamp": 1746093600
            }}"#,
        )
        .unwrap();

        let pool = pool.unwrap();
        assert_eq!(pool.token_a_symbol, "MOON");
        assert_eq!(pool.tvl, dec!(8400.25));
        assert_eq!(pool.liquidity.parse::<u128>().unwrap(), u128::MAX);
        assert_eq!(pool.created_at_slot, 350_000_000);
    }

    #[test]
    fn test_metrics_decode() {
        let metrics: Option<MigratedPoolMetrics> = decode_envelope(
            r#"{"data": {
                "pool_address": "pool-1", "tvl": 8400, "volume24h": 15000,
                "volume7d": 90000, "volume30d": 300000,
                "lp_fee24h": 30, "lp_fee7d": 180, "lp_fee30d": 600,
                "partner_fee24h": 5, "partner_fee7d": 30, "partner_fee30d": 100,
                "protocol_fee24h": 2.5, "protocol_fee7d": 15, "protocol_fee30d": 50,
                "apr": 130.36, "fee_tvl_ratio": 0.0045
            }}"#,
        )
        .unwrap();

        let metrics = metrics.unwrap();
        assert_eq!(metrics.volume7d, dec!(90000));
        assert_eq!(metrics.total_fee24h(), dec!(37.5));
        assert_eq!(metrics.apr, dec!(130.36));
    }

    #[test]
    fn test_missing_data_is_none() {
        let pool: Option<MigratedPool> = decode_envelope(r#"{"data": null}"#).unwrap();
        assert!(pool.is_none());
        assert!(decode_envelope::<MigratedPool>(r#"{"data": {"pool_address": 1}}"#).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_degrades() {
        let client = MigratedPoolClient::new(MigratedPoolConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap();
        let feed = JupiterFeed::new(FeedConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.pool_url("abc"), "http://127.0.0.1:9/pools/abc");
        assert!(client.metrics("abc").await.is_none());
        assert!(client.details(&feed, "abc", None).await.is_none());
    }
}
