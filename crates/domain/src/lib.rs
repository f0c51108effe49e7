//! Core domain types for the launchpad: venues, assets, quotes, listing rows
//! and the error taxonomy shared by the resolver and the listing crates.

pub mod entities;
pub mod enums;
pub mod errors;
pub mod labels;
pub mod value_objects;

pub use entities::{AssetInfo, ClaimableFees, DecimalsSource, FeeTotals, ListingEntry, Reserves};
pub use enums::{
    ActivationType, ListingCategory, ReserveSide, SortDirection, SortField, SourceOrigin,
    TradeDirection, VenueKind,
};
pub use errors::{QuoteError, QuoteUnavailable, ResolveError};
pub use value_objects::quote::QuoteResult;
