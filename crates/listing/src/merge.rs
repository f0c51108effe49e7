//! Merging live rows with historical backfill.

use mooner_domain::{ListingCategory, ListingEntry};
use std::collections::HashSet;

/// Live rows first in their existing order, then historical rows whose token
/// is not live, in historical order. A token appears at most once; the first
/// occurrence wins.
pub fn merge(live: &[ListingEntry], historical: &[ListingEntry]) -> Vec<ListingEntry> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(live.len() + historical.len());
    let mut merged = Vec::with_capacity(live.len() + historical.len());

    for entry in live.iter().chain(historical) {
        if seen.insert(entry.token_id.as_str()) {
            merged.push(entry.clone());
        }
    }
    merged
}

/// [`merge`] after restricting the historical rows to those `category` admits.
pub fn merge_category(
    category: ListingCategory,
    live: &[ListingEntry],
    historical: &[ListingEntry],
) -> Vec<ListingEntry> {
    let backfill = category.backfill();
    let admitted: Vec<ListingEntry> = historical
        .iter()
        .filter(|entry| backfill.admits(entry.is_migrated))
        .cloned()
        .collect();
    merge(live, &admitted)
}
