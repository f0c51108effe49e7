use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Swap quote against a resolved pool. Ephemeral: recomputed whenever the
/// pool, direction or input amount changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub amount_out: u64,
    /// `amount_out` after the slippage tolerance.
    pub minimum_amount_out: u64,
    pub fee_amount: u64,
    /// Always within [0, 100].
    pub price_impact_pct: Decimal,
}

impl QuoteResult {
    pub fn new(
        amount_out: u64,
        minimum_amount_out: u64,
        fee_amount: u64,
        price_impact_pct: Decimal,
    ) -> Self {
        Self {
            amount_out,
            minimum_amount_out,
            fee_amount,
            price_impact_pct: clamp_price_impact(price_impact_pct),
        }
    }
}

/// Clamps a price-impact percentage into [0, 100].
pub fn clamp_price_impact(pct: Decimal) -> Decimal {
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}
