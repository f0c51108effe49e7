//! Creator fees claimable from the bonding-curve fee ledger.

use crate::config::CreatorFeeConfig;
use mooner_domain::{ClaimableFees, FeeTotals};
use mooner_protocols::error::VenueError;
use mooner_protocols::venues::BondingCurveVenue;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

/// Looks up claimable creator fees. Fees stay claimable from the
/// bonding-curve venue after migration.
pub struct CreatorFeeService {
    venue: Arc<dyn BondingCurveVenue>,
    config: CreatorFeeConfig,
}

impl CreatorFeeService {
    #[must_use]
    pub fn new(venue: Arc<dyn BondingCurveVenue>, config: CreatorFeeConfig) -> Self {
        Self { venue, config }
    }

    /// Claimable fees for one token as seen by `wallet`. `Ok(None)` when the
    /// token has no bonding-curve pool.
    ///
    /// # Errors
    /// Returns an error if the venue cannot be queried.
    pub async fn claimable_fees(
        &self,
        base_mint: &Pubkey,
        wallet: &Pubkey,
    ) -> Result<Option<ClaimableFees>, VenueError> {
        let Some(pool) = self.venue.pool_by_base_mint(base_mint).await? else {
            return Ok(None);
        };

        let metrics = self
            .venue
            .pool_fee_metrics(&pool.address)
            .await?
            .unwrap_or_default();

        let has_claimable_fees = metrics.creator_quote_fee > 0 || metrics.creator_base_fee > 0;
        let quote_fee = to_units(metrics.creator_quote_fee, self.config.quote_decimals);
        let base_fee_tokens = to_units(metrics.creator_base_fee, self.config.base_decimals);

        Ok(Some(ClaimableFees {
            base_mint: *base_mint,
            pool: pool.address,
            creator_quote_fee: metrics.creator_quote_fee,
            creator_base_fee: metrics.creator_base_fee,
            quote_fee_usd: quote_fee * self.config.sol_price_usd,
            base_fee_tokens,
            has_claimable_fees,
            is_creator: pool.creator == *wallet,
            is_migrated: pool.is_migrated,
        }))
    }

    /// Claimable fees for each mint, looked up one after another. Mints
    /// without a pool or whose lookup failed are left out.
    pub async fn claimable_fees_for(
        &self,
        base_mints: &[Pubkey],
        wallet: &Pubkey,
    ) -> Vec<ClaimableFees> {
        let mut fees = Vec::with_capacity(base_mints.len());
        for mint in base_mints {
            match self.claimable_fees(mint, wallet).await {
                Ok(Some(info)) => fees.push(info),
                Ok(None) => debug!(mint = %mint, "No bonding-curve pool for mint"),
                Err(e) => warn!(mint = %mint, error = %e, "Failed to fetch creator fee balance"),
            }
        }
        fees
    }

    /// Fees plus totals over the pools `wallet` created.
    pub async fn summary(&self, base_mints: &[Pubkey], wallet: &Pubkey) -> (Vec<ClaimableFees>, FeeTotals) {
        let fees = self.claimable_fees_for(base_mints, wallet).await;
        let totals = FeeTotals::from_fees(&fees);
        (fees, totals)
    }
}

/// Scales above what `Decimal` holds leave any u64 amount below 1e-9 of a
/// unit, which reads as zero.
fn to_units(amount: u64, decimals: u32) -> Decimal {
    Decimal::try_from_i128_with_scale(i128::from(amount), decimals).unwrap_or(Decimal::ZERO)
}
