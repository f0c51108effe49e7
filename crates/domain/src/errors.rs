//! Error taxonomy for pool resolution and quoting.

use crate::enums::ReserveSide;
use thiserror::Error;

/// Failure to map a token to its authoritative pool.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The token identifier is not a valid account address.
    #[error("Invalid token address: {0}")]
    InvalidTokenId(String),

    /// Neither venue hosts a pool for the token.
    #[error("Pool not found. Token may not be traded yet.")]
    NotFound,

    /// A bonding-curve pool exists but its configuration account is missing.
    #[error("Pool config not found")]
    ConfigMissing,

    /// A dependency call failed.
    #[error("Failed to fetch pool info: {0}")]
    UpstreamUnavailable(String),

    /// One side's vault balance could not be read. Never returned from
    /// resolution; the side is treated as zero and this is only logged.
    #[error("Could not fetch {side} vault balance: {reason}")]
    PartialReserveRead { side: ReserveSide, reason: String },
}

impl ResolveError {
    /// Whether the error should be shown to the user as a message.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ResolveError::PartialReserveRead { .. })
    }
}

/// Benign reasons a quote is empty. These clear the quote without an error
/// banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteUnavailable {
    /// No input amount was supplied.
    NoInput,
    /// The input amount is too small to produce any output.
    AmountTooSmall,
    /// The venue has swapping disabled for this pool.
    SwapDisabled,
}

/// Failure to compute a quote that must be surfaced to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// The pool the handle points at could not be re-read.
    #[error("Pool state is no longer available")]
    PoolStateMissing,

    #[error("Failed to get quote: {0}")]
    Upstream(String),
}
