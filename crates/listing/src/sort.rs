use mooner_domain::{ListingEntry, SortDirection, SortField};
use std::cmp::Ordering;

/// Stable sort on a single field. Rows without a value for `field` go last
/// regardless of direction; ties keep their current order.
pub fn sort_entries(entries: &mut [ListingEntry], field: SortField, direction: SortDirection) {
    entries.sort_by(|a, b| match (a.sort_key(field), b.sort_key(field)) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.cmp(&y),
            SortDirection::Desc => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
