//! Venue client interfaces.
//!
//! Both venues are external programs whose math lives in their own SDKs;
//! these traits only describe what the resolver needs from them. The
//! ledger-backed clients decode pool accounts but leave quoting to an SDK
//! implementation of the same traits.

mod bonding_curve;
mod cp_amm;
pub mod layout;
mod onchain;

pub use bonding_curve::{BondingCurveQuoteRequest, BondingCurveVenue, FeeMetrics, PoolConfig, VirtualPool};
pub use cp_amm::{CpAmmPoolState, CpAmmQuoteRequest, CpAmmVenue};
pub use onchain::{QUOTE_UNAVAILABLE, RpcBondingCurve, RpcCpAmm};

use rust_decimal::Decimal;

/// Quote returned by either venue's SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueQuote {
    /// Expected output in minor units.
    pub output_amount: u64,
    /// Output after slippage, when the venue computes it.
    pub minimum_amount_out: Option<u64>,
    /// Total trading fee in minor units.
    pub trading_fee: u64,
    /// Price impact in percent, when the venue reports it.
    pub price_impact_pct: Option<Decimal>,
}
