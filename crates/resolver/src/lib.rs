//! Pool resolution and quoting.
//!
//! Maps a token mint to the single venue currently hosting it (bonding curve
//! or migrated constant-product pool), quotes swaps against the resolved
//! pool, and reports creator fees claimable from the bonding-curve venue.
//!
//! All venue and ledger access goes through the traits in `mooner-protocols`,
//! injected at construction.

pub mod config;
pub mod creator_fees;
pub mod guard;
pub mod handle;
pub mod quote;
pub mod resolver;
pub mod strategy;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{CreatorFeeConfig, ResolverConfig};
pub use creator_fees::CreatorFeeService;
pub use guard::GuardedResolver;
pub use handle::{PoolHandle, VenueState};
pub use resolver::PoolResolver;
pub use strategy::{PairOrder, ResolutionStrategy};
pub use tracker::{QuoteInputs, QuoteTicket, QuoteTracker};
