pub mod asset;
pub mod creator_fee;
pub mod listing;

// Re-export for easier access
pub use asset::{AssetInfo, DecimalsSource, Reserves};
pub use creator_fee::{ClaimableFees, FeeTotals};
pub use listing::ListingEntry;
