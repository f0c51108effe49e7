//! Discovery listings.
//!
//! Combines the live feed with the historical store into one list per
//! category ([`merge`], [`sort`], [`reconciler`]) and freezes row order
//! while the user interacts with a list ([`pause`], [`controller`]).

pub mod config;
pub mod controller;
pub mod error;
pub mod merge;
pub mod pause;
pub mod reconciler;
pub mod sort;

pub use config::{ListingConfig, PauseConfig};
pub use controller::PauseController;
pub use error::ListingError;
pub use merge::{merge, merge_category};
pub use pause::{PauseMode, PausePolicy, PausedSnapshot, UnpauseTicket};
pub use reconciler::{CategoryListing, ListingReconciler};
pub use sort::sort_entries;
