use crate::enums::{SortField, SourceOrigin};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a discovery list.
///
/// `token_id` (the base mint) is the identity used for de-duplication across
/// sources; the remaining fields are display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub token_id: String,
    pub pool_id: String,
    pub source: SourceOrigin,

    pub name: String,
    pub symbol: String,
    pub icon: Option<String>,

    pub price_usd: Option<Decimal>,
    pub market_cap_usd: Option<Decimal>,
    pub volume_24h: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub holder_count: Option<u64>,
    /// Bonding-curve progress in percent; 100 once graduated.
    pub bonding_curve_pct: Option<Decimal>,

    pub is_migrated: bool,
    pub graduated_pool: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub graduated_at: Option<DateTime<Utc>>,

    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

impl ListingEntry {
    /// Minimal row with every optional field empty.
    pub fn new(
        token_id: impl Into<String>,
        pool_id: impl Into<String>,
        source: SourceOrigin,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            pool_id: pool_id.into(),
            source,
            name: "Unknown".to_string(),
            symbol: "???".to_string(),
            icon: None,
            price_usd: None,
            market_cap_usd: None,
            volume_24h: None,
            liquidity: None,
            holder_count: None,
            bonding_curve_pct: None,
            is_migrated: false,
            graduated_pool: None,
            created_at: None,
            graduated_at: None,
            twitter: None,
            telegram: None,
            website: None,
        }
    }

    #[must_use]
    pub fn with_price(mut self, price_usd: Decimal) -> Self {
        self.price_usd = Some(price_usd);
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn migrated(mut self) -> Self {
        self.is_migrated = true;
        self.bonding_curve_pct = Some(Decimal::ONE_HUNDRED);
        self
    }

    /// Value of `field` as a comparable decimal. Timestamps are expressed in
    /// milliseconds since the epoch.
    pub fn sort_key(&self, field: SortField) -> Option<Decimal> {
        match field {
            SortField::CreatedAt => self.created_at.map(|t| Decimal::from(t.timestamp_millis())),
            SortField::GraduatedAt => self
                .graduated_at
                .map(|t| Decimal::from(t.timestamp_millis())),
            SortField::MarketCap => self.market_cap_usd,
            SortField::Price => self.price_usd,
            SortField::Volume24h => self.volume_24h,
            SortField::Liquidity => self.liquidity,
            SortField::HolderCount => self.holder_count.map(Decimal::from),
            SortField::BondingCurve => self.bonding_curve_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sort_key_reads_requested_field() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let entry = ListingEntry::new("mint", "pool", SourceOrigin::LiveFeed)
            .with_price(dec!(0.5))
            .with_created_at(created);

        assert_eq!(entry.sort_key(SortField::Price), Some(dec!(0.5)));
        assert_eq!(
            entry.sort_key(SortField::CreatedAt),
            Some(Decimal::from(created.timestamp_millis()))
        );
        assert_eq!(entry.sort_key(SortField::Volume24h), None);
    }

    #[test]
    fn test_migrated_marks_full_curve() {
        let entry = ListingEntry::new("mint", "pool", SourceOrigin::HistoricalStore).migrated();
        assert!(entry.is_migrated);
        assert_eq!(entry.bonding_curve_pct, Some(dec!(100)));
    }

    #[test]
    fn test_listing_entry_serde() {
        let entry = ListingEntry::new("mint", "pool", SourceOrigin::LiveFeed).with_price(dec!(1));
        let json = serde_json::to_string(&entry).unwrap();
        let back: ListingEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
