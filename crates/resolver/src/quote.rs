//! Swap quotes against a resolved pool.
//!
//! Pricing is delegated to the venue; this module only supplies the shared
//! context (activation clock, direction and decimal routing) and normalizes
//! the result.

use crate::handle::{PoolHandle, VenueState};
use crate::resolver::PoolResolver;
use mooner_domain::value_objects::quote::clamp_price_impact;
use mooner_domain::{
    ActivationType, QuoteError, QuoteResult, QuoteUnavailable, Reserves, TradeDirection,
};
use mooner_protocols::error::VenueError;
use mooner_protocols::venues::{BondingCurveQuoteRequest, CpAmmQuoteRequest, VenueQuote};
use rust_decimal::Decimal;
use tracing::{debug, warn};

impl PoolResolver {
    /// Quotes `amount_in` (minor units of the input side) against `handle`.
    ///
    /// Returns `Ok(None)` when there is nothing to quote: a zero input, or a
    /// venue reporting that the amount is too small or swapping is disabled.
    ///
    /// # Errors
    /// Returns `PoolStateMissing` if the bonding-curve pool or its config can
    /// no longer be read, and `Upstream` for any other venue or ledger failure.
    pub async fn quote(
        &self,
        handle: &PoolHandle,
        direction: TradeDirection,
        amount_in: u64,
        slippage_bps: u16,
    ) -> Result<Option<QuoteResult>, QuoteError> {
        if amount_in == 0 {
            debug!(pool = %handle.pool_address, reason = ?QuoteUnavailable::NoInput, "Quote cleared");
            return Ok(None);
        }

        match &handle.venue_state {
            VenueState::BondingCurve { .. } => {
                self.quote_bonding_curve(handle, direction, amount_in, slippage_bps)
                    .await
            }
            VenueState::Migrated {
                pool_state,
                token_a_is_base,
            } => {
                let token_a_is_base = *token_a_is_base;
                let a_to_b = match direction {
                    TradeDirection::Buy => !token_a_is_base,
                    TradeDirection::Sell => token_a_is_base,
                };
                let (token_a_decimals, token_b_decimals) = if token_a_is_base {
                    (handle.base.decimals, handle.quote.decimals)
                } else {
                    (handle.quote.decimals, handle.base.decimals)
                };
                let current_point = self.current_point(pool_state.activation_type).await?;

                let quote = self
                    .cp_amm
                    .swap_quote_exact_input(CpAmmQuoteRequest {
                        pool_state: pool_state.clone(),
                        current_point,
                        amount_in,
                        slippage_bps,
                        a_to_b,
                        has_referral: false,
                        token_a_decimals,
                        token_b_decimals,
                    })
                    .await
                    .map(|q| to_result(q, q.price_impact_pct.unwrap_or(Decimal::ZERO)));
                settle(handle, quote)
            }
        }
    }

    async fn quote_bonding_curve(
        &self,
        handle: &PoolHandle,
        direction: TradeDirection,
        amount_in: u64,
        slippage_bps: u16,
    ) -> Result<Option<QuoteResult>, QuoteError> {
        let upstream = |e: VenueError| QuoteError::Upstream(e.to_string());

        let pool = self
            .bonding_curve
            .pool_by_base_mint(&handle.base.mint)
            .await
            .map_err(upstream)?
            .ok_or(QuoteError::PoolStateMissing)?;
        let config = self
            .bonding_curve
            .pool_config(&pool.config)
            .await
            .map_err(upstream)?
            .ok_or(QuoteError::PoolStateMissing)?;
        let current_point = self.current_point(config.activation_type).await?;

        let quote = self
            .bonding_curve
            .swap_quote(BondingCurveQuoteRequest {
                pool,
                config,
                swap_base_for_quote: direction.swap_base_for_quote(),
                amount_in,
                slippage_bps,
                has_referral: false,
                current_point,
            })
            .await
            .map(|q| {
                let impact =
                    reserve_price_impact(handle.reserves, direction, amount_in, q.output_amount);
                to_result(q, impact)
            });
        settle(handle, quote)
    }

    async fn current_point(&self, activation: ActivationType) -> Result<u64, QuoteError> {
        self.ledger
            .current_point(activation)
            .await
            .map_err(|e| QuoteError::Upstream(e.to_string()))
    }
}

fn to_result(quote: VenueQuote, price_impact_pct: Decimal) -> QuoteResult {
    QuoteResult::new(
        quote.output_amount,
        quote.minimum_amount_out.unwrap_or(quote.output_amount),
        quote.trading_fee,
        price_impact_pct,
    )
}

/// Maps the venue's answer. Benign venue errors clear the quote.
fn settle(
    handle: &PoolHandle,
    quote: Result<QuoteResult, VenueError>,
) -> Result<Option<QuoteResult>, QuoteError> {
    match quote {
        Ok(quote) => Ok(Some(quote)),
        Err(e) => match benign_reason(&e) {
            Some(reason) => {
                debug!(pool = %handle.pool_address, reason = ?reason, "Quote cleared");
                Ok(None)
            }
            None => {
                warn!(pool = %handle.pool_address, error = %e, "Error getting quote");
                Err(QuoteError::Upstream(e.to_string()))
            }
        },
    }
}

fn benign_reason(err: &VenueError) -> Option<QuoteUnavailable> {
    match err {
        VenueError::ZeroOutput => Some(QuoteUnavailable::AmountTooSmall),
        VenueError::SwapDisabled => Some(QuoteUnavailable::SwapDisabled),
        VenueError::Upstream(_) => None,
    }
}

/// Price impact of a bonding-curve trade from the quote/base reserve ratio
/// before and after the trade, in percent and clamped to [0, 100].
///
/// Divisors are floored at one minor unit. An empty quote reserve has no
/// meaningful ratio and reports full impact.
pub fn reserve_price_impact(
    reserves: Reserves,
    direction: TradeDirection,
    amount_in: u64,
    amount_out: u64,
) -> Decimal {
    let base = i128::from(reserves.base);
    let quote = i128::from(reserves.quote);
    let amount_in = i128::from(amount_in);
    let amount_out = i128::from(amount_out);

    let ratio = |num: i128, den: i128| {
        Decimal::from_i128_with_scale(num, 0).checked_div(Decimal::from_i128_with_scale(den.max(1), 0))
    };

    let Some(current) = ratio(quote, base) else {
        return Decimal::ONE_HUNDRED;
    };
    if current.is_zero() {
        return Decimal::ONE_HUNDRED;
    }

    let after = match direction {
        TradeDirection::Buy => ratio(quote + amount_in, base - amount_out),
        TradeDirection::Sell => ratio(quote - amount_out, base + amount_in),
    };
    let Some(after) = after else {
        return Decimal::ONE_HUNDRED;
    };

    after
        .checked_sub(current)
        .and_then(|delta| delta.checked_div(current))
        .and_then(|ratio| ratio.abs().checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ONE_HUNDRED, clamp_price_impact)
}
