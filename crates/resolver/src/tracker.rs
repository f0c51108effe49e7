//! Current-quote bookkeeping.
//!
//! A quote is only ever shown for the inputs it was computed from. Changing
//! the inputs clears the quote immediately, a failed recomputation leaves it
//! cleared, and a result that arrives after the inputs moved on is dropped.

use crate::handle::PoolHandle;
use crate::resolver::PoolResolver;
use mooner_domain::{QuoteError, QuoteResult, TradeDirection};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;
use tracing::debug;

/// Everything a quote depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteInputs {
    pub pool: Pubkey,
    pub direction: TradeDirection,
    pub amount_in: u64,
    pub slippage_bps: u16,
}

/// Identifies the inputs a pending computation was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTicket {
    generation: u64,
}

#[derive(Debug, Default)]
struct TrackerState {
    generation: u64,
    inputs: Option<QuoteInputs>,
    quote: Option<QuoteResult>,
    last_error: Option<QuoteError>,
}

/// Holds the quote for the latest inputs.
#[derive(Debug, Default)]
pub struct QuoteTracker {
    state: RwLock<TrackerState>,
}

impl QuoteTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records new inputs and returns the ticket a computation for them must
    /// present. The current quote is cleared if the inputs changed.
    pub async fn set_inputs(&self, inputs: QuoteInputs) -> QuoteTicket {
        let mut state = self.state.write().await;
        if state.inputs != Some(inputs) {
            state.generation += 1;
            state.inputs = Some(inputs);
            state.quote = None;
            state.last_error = None;
        }
        QuoteTicket {
            generation: state.generation,
        }
    }

    /// Stores the outcome of a computation. Returns false, leaving state
    /// untouched, when the ticket belongs to superseded inputs.
    pub async fn complete(
        &self,
        ticket: QuoteTicket,
        outcome: Result<Option<QuoteResult>, QuoteError>,
    ) -> bool {
        let mut state = self.state.write().await;
        if ticket.generation != state.generation {
            debug!(
                ticket = ticket.generation,
                current = state.generation,
                "Discarding stale quote"
            );
            return false;
        }
        match outcome {
            Ok(quote) => {
                state.quote = quote;
                state.last_error = None;
            }
            Err(e) => {
                state.quote = None;
                state.last_error = Some(e);
            }
        }
        true
    }

    /// Sets the inputs and recomputes the quote against `handle`. Yields
    /// `Ok(None)` when the inputs changed while the quote was in flight.
    ///
    /// # Errors
    /// Returns the quote failure; the tracker is left without a quote.
    pub async fn refresh(
        &self,
        resolver: &PoolResolver,
        handle: &PoolHandle,
        direction: TradeDirection,
        amount_in: u64,
        slippage_bps: u16,
    ) -> Result<Option<QuoteResult>, QuoteError> {
        let ticket = self
            .set_inputs(QuoteInputs {
                pool: handle.pool_address,
                direction,
                amount_in,
                slippage_bps,
            })
            .await;
        let outcome = resolver
            .quote(handle, direction, amount_in, slippage_bps)
            .await;
        if !self.complete(ticket, outcome.clone()).await {
            return Ok(None);
        }
        outcome
    }

    /// Drops the inputs and any quote.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.inputs = None;
        state.quote = None;
        state.last_error = None;
    }

    pub async fn current(&self) -> Option<QuoteResult> {
        self.state.read().await.quote
    }

    pub async fn last_error(&self) -> Option<QuoteError> {
        self.state.read().await.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::testing::{FakeBondingCurve, FakeCpAmm, FakeLedger};
    use mooner_protocols::addresses::native_mint;
    use mooner_protocols::venues::VenueQuote;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn inputs(amount_in: u64) -> QuoteInputs {
        QuoteInputs {
            pool: Pubkey::new_from_array([7; 32]),
            direction: TradeDirection::Buy,
            amount_in,
            slippage_bps: 100,
        }
    }

    fn quote(out: u64) -> QuoteResult {
        QuoteResult::new(out, out, 0, dec!(0.1))
    }

    #[tokio::test]
    async fn test_input_change_clears_quote() {
        let tracker = QuoteTracker::new();
        let ticket = tracker.set_inputs(inputs(10)).await;
        assert!(tracker.complete(ticket, Ok(Some(quote(5)))).await);
        assert_eq!(tracker.current().await, Some(quote(5)));

        tracker.set_inputs(inputs(20)).await;
        assert_eq!(tracker.current().await, None);
    }

    #[tokio::test]
    async fn test_same_inputs_keep_quote() {
        let tracker = QuoteTracker::new();
        let ticket = tracker.set_inputs(inputs(10)).await;
        tracker.complete(ticket, Ok(Some(quote(5)))).await;

        let again = tracker.set_inputs(inputs(10)).await;
        assert_eq!(again, ticket);
        assert_eq!(tracker.current().await, Some(quote(5)));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let tracker = QuoteTracker::new();
        let old = tracker.set_inputs(inputs(10)).await;
        let new = tracker.set_inputs(inputs(20)).await;

        assert!(!tracker.complete(old, Ok(Some(quote(5)))).await);
        assert_eq!(tracker.current().await, None);

        assert!(tracker.complete(new, Ok(Some(quote(9)))).await);
        assert_eq!(tracker.current().await, Some(quote(9)));
    }

    #[tokio::test]
    async fn test_failure_clears_quote() {
        let tracker = QuoteTracker::new();
        let ticket = tracker.set_inputs(inputs(10)).await;
        tracker.complete(ticket, Ok(Some(quote(5)))).await;

        tracker
            .complete(ticket, Err(QuoteError::Upstream("boom".to_string())))
            .await;
        assert_eq!(tracker.current().await, None);
        assert!(tracker.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_benign_empty_quote_has_no_error() {
        let tracker = QuoteTracker::new();
        let ticket = tracker.set_inputs(inputs(0)).await;
        tracker.complete(ticket, Ok(None)).await;
        assert_eq!(tracker.current().await, None);
        assert_eq!(tracker.last_error().await, None);
    }

    fn resolver_with(bc: FakeBondingCurve) -> PoolResolver {
        bc.set_quote(Ok(VenueQuote {
            output_amount: 900,
            minimum_amount_out: Some(891),
            trading_fee: 9,
            price_impact_pct: Some(dec!(0.5)),
        }));
        PoolResolver::new(
            Arc::new(bc),
            Arc::new(FakeCpAmm::default()),
            Arc::new(FakeLedger::default()),
            ResolverConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_refresh_stores_quote() {
        let base = Pubkey::new_unique();
        let resolver = resolver_with(
            FakeBondingCurve::default().with_pool(base, native_mint(), 1_000_000, 1_000_000, false),
        );
        let handle = resolver.resolve_mint(&base).await.unwrap();
        let tracker = QuoteTracker::new();

        let quote = tracker
            .refresh(&resolver, &handle, TradeDirection::Buy, 1_000, 100)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote.amount_out, 900);
        assert_eq!(tracker.current().await, Some(quote));
    }

    #[tokio::test]
    async fn test_refresh_superseded_while_in_flight() {
        let base = Pubkey::new_unique();
        let gate = Arc::new(Notify::new());
        let resolver = resolver_with(
            FakeBondingCurve::default()
                .with_pool(base, native_mint(), 1_000_000, 1_000_000, false)
                .with_quote_gate(gate.clone()),
        );
        let handle = resolver.resolve_mint(&base).await.unwrap();
        let tracker = QuoteTracker::new();

        let (refreshed, ()) = tokio::join!(
            tracker.refresh(&resolver, &handle, TradeDirection::Buy, 1_000, 100),
            async {
                tracker
                    .set_inputs(QuoteInputs {
                        pool: handle.pool_address,
                        direction: TradeDirection::Buy,
                        amount_in: 2_000,
                        slippage_bps: 100,
                    })
                    .await;
                gate.notify_one();
            }
        );

        assert_eq!(refreshed, Ok(None));
        assert_eq!(tracker.current().await, None);
        assert_eq!(tracker.last_error().await, None);
    }
}
