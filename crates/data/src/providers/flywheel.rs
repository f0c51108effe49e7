//! Client for the flywheel service that tracks launched pools and buybacks.
//!
//! The flywheel is best effort: none of these calls fail the caller.

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::DataError;

/// Announcement of a freshly created pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreatedPayload {
    pub pool_address: String,
    pub base_mint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_mint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlywheelStats {
    pub total_fees_collected_sol: Decimal,
    pub total_sol_used_for_buyback: Decimal,
    pub total_tokens_bought: Decimal,
    pub total_tokens_burned: Decimal,
    pub total_pools: u64,
    pub active_pools: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlywheelOperation {
    pub id: String,
    pub operation_type: String,
    pub amount: Decimal,
    pub currency: String,
    pub tx_signature: Option<String>,
    pub executed_at: DateTime<Utc>,
}

pub struct FlywheelClient {
    client: Client,
    base_url: String,
}

impl FlywheelClient {
    pub const DEFAULT_URL: &'static str = "https://mooner.fun";

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers a new pool. Returns whether the service accepted it.
    pub async fn notify_pool_created(&self, payload: &PoolCreatedPayload) -> bool {
        let url = self.url("/webhook/pool-created");
        match self.client.post(&url).json(payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(pool = %payload.pool_address, "Registered pool with flywheel");
                true
            }
            Ok(resp) => {
                warn!(
                    pool = %payload.pool_address,
                    status = resp.status().as_u16(),
                    "Flywheel rejected pool registration"
                );
                false
            }
            Err(e) => {
                warn!(pool = %payload.pool_address, error = %e, "Flywheel unreachable");
                false
            }
        }
    }

    pub async fn stats(&self) -> Option<FlywheelStats> {
        match self.get_json("/stats").await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "Failed to fetch flywheel stats");
                None
            }
        }
    }

    pub async fn recent_operations(&self) -> Vec<FlywheelOperation> {
        match self.get_json("/stats/recent").await {
            Ok(ops) => ops,
            Err(e) => {
                warn!(error = %e, "Failed to fetch flywheel operations");
                Vec::new()
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, DataError> {
        let url = self.url(path);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DataError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| DataError::Decode {
            what: "flywheel response",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_is_camel_case_and_skips_empty() {
        let payload = PoolCreatedPayload {
            pool_address: "pool".to_string(),
            base_mint: "mint".to_string(),
            quote_mint: None,
            config_key: Some("cfg".to_string()),
            creator: "me".to_string(),
            name: None,
            symbol: Some("MOON".to_string()),
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["poolAddress"], "pool");
        assert_eq!(json["configKey"], "cfg");
        assert!(json.get("quoteMint").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_stats_decode() {
        let stats: FlywheelStats = serde_json::from_str(
            r#"{"total_fees_collected_sol": 1.5, "total_sol_used_for_buyback": 1.0,
                "total_tokens_bought": 1000, "total_tokens_burned": 900,
                "total_pools": 4, "active_pools": 3}"#,
        )
        .unwrap();
        assert_eq!(stats.total_fees_collected_sol, dec!(1.5));
        assert_eq!(stats.active_pools, 3);
    }

    #[test]
    fn test_operation_decode() {
        let ops: Vec<FlywheelOperation> = serde_json::from_str(
            r#"[{"id": "1", "operation_type": "buyback", "amount": "0.25",
                 "currency": "SOL", "tx_signature": null,
                 "executed_at": "2025-05-01T10:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(ops[0].amount, dec!(0.25));
        assert!(ops[0].tx_signature.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades() {
        let client =
            FlywheelClient::new("http://127.0.0.1:9/", Duration::from_millis(200)).unwrap();
        assert_eq!(client.url("/stats"), "http://127.0.0.1:9/stats");
        assert!(client.stats().await.is_none());
        assert!(client.recent_operations().await.is_empty());
    }
}
