use super::VenueQuote;
use crate::error::VenueError;
use async_trait::async_trait;
use mooner_domain::ActivationType;
use solana_sdk::pubkey::Pubkey;

/// Decoded bonding-curve pool account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPool {
    pub address: Pubkey,
    pub config: Pubkey,
    pub creator: Pubkey,
    pub base_mint: Pubkey,
    pub base_reserve: u64,
    pub quote_reserve: u64,
    /// Set once the curve completed and liquidity moved to the AMM.
    pub is_migrated: bool,
}

/// Decoded bonding-curve config account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub address: Pubkey,
    pub quote_mint: Pubkey,
    /// Quote reserve at which the pool graduates.
    pub migration_quote_threshold: u64,
    pub activation_type: ActivationType,
    pub creator_trading_fee_percentage: u8,
}

/// Creator/partner fee ledger of a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeMetrics {
    pub creator_quote_fee: u64,
    pub creator_base_fee: u64,
}

/// Inputs for a bonding-curve swap quote.
#[derive(Debug, Clone)]
pub struct BondingCurveQuoteRequest {
    pub pool: VirtualPool,
    pub config: PoolConfig,
    /// True when selling base for quote.
    pub swap_base_for_quote: bool,
    pub amount_in: u64,
    pub slippage_bps: u16,
    pub has_referral: bool,
    pub current_point: u64,
}

/// Client of the bonding-curve program.
#[async_trait]
pub trait BondingCurveVenue: Send + Sync {
    /// Pool whose base mint is `base_mint`, if any.
    ///
    /// # Errors
    /// Returns an error if the venue cannot be queried.
    async fn pool_by_base_mint(&self, base_mint: &Pubkey) -> Result<Option<VirtualPool>, VenueError>;

    async fn pool_config(&self, address: &Pubkey) -> Result<Option<PoolConfig>, VenueError>;

    /// Fee ledger of a pool; `None` when the pool has no fee metrics.
    async fn pool_fee_metrics(&self, pool: &Pubkey) -> Result<Option<FeeMetrics>, VenueError>;

    async fn swap_quote(&self, request: BondingCurveQuoteRequest) -> Result<VenueQuote, VenueError>;
}
