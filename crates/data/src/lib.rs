//! Listing sources for the launchpad.
//!
//! - [`repositories`]: the historical pool store (Postgres)
//! - [`providers`]: the live listing feed, migrated-pool metrics and the
//!   flywheel service (HTTP)
//! - [`sources`]: the traits the listing reconciler consumes

pub mod error;
pub mod providers;
pub mod repositories;
pub mod sources;

pub use error::DataError;
pub use sources::{HistoricalStore, LiveFeed, LiveListings};
