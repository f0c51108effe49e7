//! Listing sources consumed by the reconciler.

use crate::error::DataError;
use crate::repositories::{PoolQuery, PoolStoreRepository, StatusFilter, StoreSortField};
use async_trait::async_trait;
use mooner_domain::{ListingCategory, ListingEntry, SortDirection};
use std::collections::HashMap;

/// One snapshot of the live feed, per category. A category the feed did not
/// return is absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveListings {
    categories: HashMap<ListingCategory, Vec<ListingEntry>>,
}

impl LiveListings {
    #[must_use]
    pub fn with_category(mut self, category: ListingCategory, entries: Vec<ListingEntry>) -> Self {
        self.categories.insert(category, entries);
        self
    }

    pub fn get(&self, category: ListingCategory) -> Option<&[ListingEntry]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    /// Every live row across all categories.
    pub fn all_entries(&self) -> impl Iterator<Item = &ListingEntry> {
        self.categories.values().flatten()
    }
}

/// Time-windowed feed of recently active tokens.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Fetches every category.
    ///
    /// # Errors
    /// Returns an error if the feed cannot be reached or decoded.
    async fn fetch(&self) -> Result<LiveListings, DataError>;
}

/// Full history of launched tokens.
#[async_trait]
pub trait HistoricalStore: Send + Sync {
    /// Newest `limit` rows of any status, newest first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    async fn recent_pools(&self, limit: u32) -> Result<Vec<ListingEntry>, DataError>;
}

#[async_trait]
impl HistoricalStore for PoolStoreRepository {
    async fn recent_pools(&self, limit: u32) -> Result<Vec<ListingEntry>, DataError> {
        let page = self
            .list(PoolQuery {
                page: 1,
                page_size: limit,
                status: StatusFilter::All,
                sort_by: StoreSortField::CreatedAt,
                sort_dir: SortDirection::Desc,
                search: None,
            })
            .await?;
        Ok(page.pools.iter().map(|p| p.to_listing_entry()).collect())
    }
}
