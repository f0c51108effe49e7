//! Per-category discovery listings built from the live feed and the
//! historical store.

use crate::config::ListingConfig;
use crate::error::ListingError;
use crate::merge::merge_category;
use crate::sort::sort_entries;
use mooner_data::{HistoricalStore, LiveFeed, LiveListings};
use mooner_domain::{ListingCategory, ListingEntry, SortDirection, SortField};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One category's merged rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListing {
    pub category: ListingCategory,
    pub entries: Vec<ListingEntry>,
}

pub struct ListingReconciler {
    feed: Arc<dyn LiveFeed>,
    store: Arc<dyn HistoricalStore>,
    config: ListingConfig,
}

impl ListingReconciler {
    #[must_use]
    pub fn new(
        feed: Arc<dyn LiveFeed>,
        store: Arc<dyn HistoricalStore>,
        config: ListingConfig,
    ) -> Self {
        Self {
            feed,
            store,
            config,
        }
    }

    /// Queries both sources concurrently. A store failure degrades to an
    /// empty backfill.
    async fn fetch_sources(&self) -> Result<(LiveListings, Vec<ListingEntry>), ListingError> {
        let (live, historical) = tokio::join!(
            self.feed.fetch(),
            self.store.recent_pools(self.config.historical_limit)
        );

        let live = live.map_err(|e| {
            warn!(error = %e, "Live feed failed");
            ListingError::LiveFeed(e)
        })?;
        let historical = historical.unwrap_or_else(|e| {
            warn!(error = %e, "Historical store failed, listing without backfill");
            Vec::new()
        });
        Ok((live, historical))
    }

    /// Every category, live rows in feed order.
    ///
    /// # Errors
    /// Returns an error if the live feed fails.
    pub async fn listings(&self) -> Result<Vec<CategoryListing>, ListingError> {
        let (live, historical) = self.fetch_sources().await?;
        let listings: Vec<CategoryListing> = ListingCategory::ALL
            .iter()
            .map(|&category| build(category, &live, &historical, None))
            .collect();

        info!(
            live = live.all_entries().count(),
            historical = historical.len(),
            "Reconciled listings"
        );
        Ok(listings)
    }

    /// One category, optionally reordering the live rows. `None` keeps the
    /// feed order.
    ///
    /// # Errors
    /// Returns an error if the live feed fails.
    pub async fn category(
        &self,
        category: ListingCategory,
        sort: Option<(SortField, SortDirection)>,
    ) -> Result<CategoryListing, ListingError> {
        let (live, historical) = self.fetch_sources().await?;
        Ok(build(category, &live, &historical, sort))
    }

    /// Historical rows absent from every live category.
    ///
    /// # Errors
    /// Returns an error if the live feed fails.
    pub async fn historical_only(&self) -> Result<Vec<ListingEntry>, ListingError> {
        let (live, historical) = self.fetch_sources().await?;
        let live_ids: HashSet<&str> = live.all_entries().map(|e| e.token_id.as_str()).collect();
        let missing: Vec<ListingEntry> = historical
            .into_iter()
            .filter(|e| !live_ids.contains(e.token_id.as_str()))
            .collect();
        debug!(count = missing.len(), "Historical rows missing from live feed");
        Ok(missing)
    }
}

/// Live rows of `category`, sorted when asked, followed by the admitted
/// backfill. The historical rows keep the store's order.
fn build(
    category: ListingCategory,
    live: &LiveListings,
    historical: &[ListingEntry],
    sort: Option<(SortField, SortDirection)>,
) -> CategoryListing {
    let mut live_rows = live.get(category).map(<[_]>::to_vec).unwrap_or_default();
    if let Some((field, direction)) = sort {
        sort_entries(&mut live_rows, field, direction);
    }
    CategoryListing {
        category,
        entries: merge_category(category, &live_rows, historical),
    }
}
