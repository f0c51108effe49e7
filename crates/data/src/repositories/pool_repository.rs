//! Historical store of every pool launched on the platform.

use chrono::{DateTime, Utc};
use mooner_domain::{ListingEntry, SortDirection, SourceOrigin};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Largest page the store will return.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Database record for a launched pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPool {
    pub id: Uuid,
    /// Bonding-curve pool address.
    pub pool_address: String,
    /// Migrated pool address, once graduated.
    pub damm_pool_address: Option<String>,
    pub base_mint: String,
    pub creator: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub icon: Option<String>,
    pub is_migrated: bool,
    pub status: String,
    pub total_fees_collected_sol: Decimal,
    pub current_marketcap_usd: Option<Decimal>,
    pub current_price_usd: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    pub volume_24h: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub holder_count: Option<i64>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPool {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            pool_address: row.try_get("pool_address")?,
            damm_pool_address: row.try_get("damm_pool_address")?,
            base_mint: row.try_get("base_mint")?,
            creator: row.try_get("creator")?,
            name: row.try_get("name")?,
            symbol: row.try_get("symbol")?,
            icon: row.try_get("icon")?,
            is_migrated: row.try_get("is_migrated")?,
            status: row.try_get("status")?,
            total_fees_collected_sol: row.try_get("total_fees_collected_sol")?,
            current_marketcap_usd: row.try_get("current_marketcap_usd")?,
            current_price_usd: row.try_get("current_price_usd")?,
            total_supply: row.try_get("total_supply")?,
            circulating_supply: row.try_get("circulating_supply")?,
            volume_24h: row.try_get("volume_24h")?,
            liquidity: row.try_get("liquidity")?,
            holder_count: row.try_get("holder_count")?,
            twitter: row.try_get("twitter")?,
            telegram: row.try_get("telegram")?,
            website: row.try_get("website")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Converts the record into a listing row.
    ///
    /// Graduated pools show a full curve and point at their migrated pool;
    /// the store has no graduation timestamp, so the last update stands in.
    pub fn to_listing_entry(&self) -> ListingEntry {
        let mut entry = ListingEntry::new(
            self.base_mint.clone(),
            self.pool_address.clone(),
            SourceOrigin::HistoricalStore,
        );
        if let Some(name) = &self.name {
            entry.name = name.clone();
        }
        if let Some(symbol) = &self.symbol {
            entry.symbol = symbol.clone();
        }
        entry.icon = self.icon.clone();
        entry.price_usd = self.current_price_usd;
        entry.market_cap_usd = self.current_marketcap_usd;
        entry.volume_24h = self.volume_24h;
        entry.liquidity = self.liquidity;
        entry.holder_count = self.holder_count.and_then(|h| u64::try_from(h).ok());
        entry.created_at = Some(self.created_at);
        entry.twitter = self.twitter.clone();
        entry.telegram = self.telegram.clone();
        entry.website = self.website.clone();

        if self.is_migrated {
            entry = entry.migrated();
            entry.graduated_at = Some(self.updated_at);
            entry.graduated_pool = self.damm_pool_address.clone();
        }
        entry
    }
}

/// Status filter for store listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Migrated,
    #[default]
    All,
}

impl StatusFilter {
    /// Parses a filter; anything unrecognized means no filter.
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => StatusFilter::Active,
            "migrated" => StatusFilter::Migrated,
            _ => StatusFilter::All,
        }
    }

    fn column_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::Active => Some("active"),
            StatusFilter::Migrated => Some("migrated"),
            StatusFilter::All => None,
        }
    }
}

/// Sortable store columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreSortField {
    #[default]
    CreatedAt,
    MarketCap,
    FeesCollected,
    UpdatedAt,
}

impl StoreSortField {
    /// Parses a column name. Unknown columns fall back to `created_at`.
    pub fn parse(value: &str) -> Self {
        match value {
            "current_marketcap_usd" => StoreSortField::MarketCap,
            "total_fees_collected_sol" => StoreSortField::FeesCollected,
            "updated_at" => StoreSortField::UpdatedAt,
            _ => StoreSortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            StoreSortField::CreatedAt => "created_at",
            StoreSortField::MarketCap => "current_marketcap_usd",
            StoreSortField::FeesCollected => "total_fees_collected_sol",
            StoreSortField::UpdatedAt => "updated_at",
        }
    }
}

/// Paged listing request.
#[derive(Debug, Clone)]
pub struct PoolQuery {
    pub page: u32,
    pub page_size: u32,
    pub status: StatusFilter,
    pub sort_by: StoreSortField,
    pub sort_dir: SortDirection,
    /// Matches name or symbol (case-insensitive substring) or the exact
    /// base mint.
    pub search: Option<String>,
}

impl Default for PoolQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            status: StatusFilter::All,
            sort_by: StoreSortField::CreatedAt,
            sort_dir: SortDirection::Desc,
            search: None,
        }
    }
}

impl PoolQuery {
    /// Clamps the page to at least 1 and the page size to 1..=100.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.search = self.search.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    fn push_filters<'a>(&'a self, qb: &mut QueryBuilder<'a, Postgres>) {
        qb.push(" WHERE TRUE");
        if let Some(status) = self.status.column_value() {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR symbol ILIKE ")
                .push_bind(pattern)
                .push(" OR base_mint = ")
                .push_bind(search.as_str())
                .push(")");
        }
    }

    fn select_builder(&self) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new("SELECT * FROM flywheel_pools");
        self.push_filters(&mut qb);
        let direction = match self.sort_dir {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        qb.push(format_args!(
            " ORDER BY {} {} NULLS LAST",
            self.sort_by.column(),
            direction
        ));
        qb.push(" LIMIT ")
            .push_bind(i64::from(self.page_size))
            .push(" OFFSET ")
            .push_bind(self.offset());
        qb
    }

    fn count_builder(&self) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM flywheel_pools");
        self.push_filters(&mut qb);
        qb
    }
}

/// One page of store results.
#[derive(Debug, Clone, Serialize)]
pub struct PoolPage {
    pub pools: Vec<StoredPool>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl PoolPage {
    fn new(pools: Vec<StoredPool>, total: i64, query: &PoolQuery) -> Self {
        let has_more = query.offset() + (pools.len() as i64) < total;
        Self {
            pools,
            total,
            page: query.page,
            page_size: query.page_size,
            has_more,
        }
    }
}

/// Pools launched by one wallet.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorPools {
    pub pools: Vec<StoredPool>,
    pub total_pools: usize,
    pub migrated_pools: usize,
}

impl CreatorPools {
    fn new(pools: Vec<StoredPool>) -> Self {
        let migrated_pools = pools.iter().filter(|p| p.is_migrated).count();
        Self {
            total_pools: pools.len(),
            migrated_pools,
            pools,
        }
    }
}

/// Supply figures recorded for a mint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyInfo {
    pub mint: String,
    pub total_supply: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    pub found: bool,
}

/// Repository over the `flywheel_pools` table.
#[derive(Clone)]
pub struct PoolStoreRepository {
    pool: Arc<PgPool>,
}

impl PoolStoreRepository {
    /// Creates a new PoolStoreRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Lists pools page by page.
    ///
    /// # Errors
    /// Returns an error if either query fails.
    pub async fn list(&self, query: PoolQuery) -> Result<PoolPage, sqlx::Error> {
        let query = query.normalized();

        let total: i64 = query
            .count_builder()
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        let rows = query
            .select_builder()
            .build()
            .fetch_all(self.pool.as_ref())
            .await?;
        let pools = rows
            .iter()
            .map(StoredPool::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PoolPage::new(pools, total, &query))
    }

    /// Finds a pool by base mint.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_base_mint(&self, base_mint: &str) -> Result<Option<StoredPool>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM flywheel_pools WHERE base_mint = $1")
            .bind(base_mint)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(StoredPool::from_row).transpose()
    }

    /// Finds every pool created by `creator`, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_creator(&self, creator: &str) -> Result<CreatorPools, sqlx::Error> {
        let rows =
            sqlx::query("SELECT * FROM flywheel_pools WHERE creator = $1 ORDER BY created_at DESC")
                .bind(creator)
                .fetch_all(self.pool.as_ref())
                .await?;
        let pools = rows
            .iter()
            .map(StoredPool::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CreatorPools::new(pools))
    }

    /// Supply recorded for `mint`; `found` is false when the mint is not
    /// tracked.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_supply(&self, mint: &str) -> Result<SupplyInfo, sqlx::Error> {
        let row = sqlx::query(
            "SELECT total_supply, circulating_supply FROM flywheel_pools WHERE base_mint = $1",
        )
        .bind(mint)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(SupplyInfo {
                mint: mint.to_string(),
                total_supply: row.try_get("total_supply")?,
                circulating_supply: row.try_get("circulating_supply")?,
                found: true,
            }),
            None => Ok(SupplyInfo {
                mint: mint.to_string(),
                total_supply: None,
                circulating_supply: None,
                found: false,
            }),
        }
    }
}
