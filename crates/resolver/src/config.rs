use mooner_protocols::addresses::native_mint;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

/// Configuration for the pool resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Quote asset paired with launched tokens on the migrated venue.
    pub quote_mint: Pubkey,
    /// Display symbol of the base asset.
    pub base_symbol: String,
    /// Default slippage tolerance in basis points.
    pub default_slippage_bps: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            quote_mint: native_mint(),
            base_symbol: "TOKEN".to_string(),
            default_slippage_bps: 100,
        }
    }
}

/// Configuration for creator fee lookups.
#[derive(Debug, Clone)]
pub struct CreatorFeeConfig {
    /// USD price of the quote asset.
    pub sol_price_usd: Decimal,
    /// Decimals used to convert quote-side fees.
    pub quote_decimals: u32,
    /// Decimals used to convert base-side fees.
    pub base_decimals: u32,
}

impl Default for CreatorFeeConfig {
    fn default() -> Self {
        Self {
            sol_price_usd: Decimal::from(200),
            quote_decimals: 9,
            base_decimals: 6,
        }
    }
}
