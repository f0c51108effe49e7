use solana_sdk::pubkey::Pubkey;

/// Decimals assumed for the quote asset when the mint account cannot be read.
///
/// This is a fallback for missing metadata, not a statement about the real
/// precision of any mint.
pub const QUOTE_DECIMALS_FALLBACK: u8 = 9;

/// Decimals assumed for the base asset when the mint account cannot be read.
///
/// Same caveat as [`QUOTE_DECIMALS_FALLBACK`]: amounts for a non-standard mint
/// will be scaled wrongly while this value is in use.
pub const BASE_DECIMALS_FALLBACK: u8 = 6;

/// Where an [`AssetInfo`]'s decimals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalsSource {
    /// Read from the mint account.
    Ledger,
    /// Metadata was unavailable and a fallback constant was used.
    Fallback,
}

/// One side of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub mint: Pubkey,
    pub symbol: String,
    pub decimals: u8,
    pub decimals_source: DecimalsSource,
}

impl AssetInfo {
    /// Builds an asset from an optional ledger lookup, falling back to
    /// `fallback` decimals when the lookup produced nothing.
    pub fn new(mint: Pubkey, symbol: impl Into<String>, decimals: Option<u8>, fallback: u8) -> Self {
        let (decimals, decimals_source) = match decimals {
            Some(d) => (d, DecimalsSource::Ledger),
            None => (fallback, DecimalsSource::Fallback),
        };
        Self {
            mint,
            symbol: symbol.into(),
            decimals,
            decimals_source,
        }
    }

    pub fn uses_fallback_decimals(&self) -> bool {
        self.decimals_source == DecimalsSource::Fallback
    }
}

/// Current base/quote reserves in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reserves {
    pub base: u64,
    pub quote: u64,
}

impl Reserves {
    pub fn new(base: u64, quote: u64) -> Self {
        Self { base, quote }
    }

    /// True when either side reads as zero, which usually means a vault read
    /// failed rather than an empty pool.
    pub fn has_empty_side(&self) -> bool {
        self.base == 0 || self.quote == 0
    }
}
