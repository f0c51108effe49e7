use super::VenueQuote;
use crate::addresses::{derive_customizable_pool_address, derive_token_vault_address};
use crate::error::VenueError;
use async_trait::async_trait;
use mooner_domain::ActivationType;
use solana_sdk::pubkey::Pubkey;

/// Decoded constant-product pool account. Price state is opaque and only
/// consumed by the venue's own quote function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpAmmPoolState {
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub activation_type: ActivationType,
    pub sqrt_price: u128,
    pub liquidity: u128,
}

impl CpAmmPoolState {
    /// Whether `mint` is token A of this pool.
    pub fn is_token_a(&self, mint: &Pubkey) -> bool {
        self.token_a_mint == *mint
    }
}

/// Inputs for an exact-input swap quote.
#[derive(Debug, Clone)]
pub struct CpAmmQuoteRequest {
    pub pool_state: CpAmmPoolState,
    pub current_point: u64,
    pub amount_in: u64,
    pub slippage_bps: u16,
    /// Direction: true swaps token A for token B.
    pub a_to_b: bool,
    pub has_referral: bool,
    pub token_a_decimals: u8,
    pub token_b_decimals: u8,
}

/// Client of the constant-product AMM program.
#[async_trait]
pub trait CpAmmVenue: Send + Sync {
    /// Customizable pool address for a mint pair.
    fn derive_pool_address(&self, token_a_mint: &Pubkey, token_b_mint: &Pubkey) -> Pubkey {
        derive_customizable_pool_address(token_a_mint, token_b_mint)
    }

    fn derive_vault_address(&self, mint: &Pubkey, pool: &Pubkey) -> Pubkey {
        derive_token_vault_address(mint, pool)
    }

    /// Reads pool state; `Ok(None)` when the account does not exist.
    ///
    /// # Errors
    /// Returns an error if the account exists but cannot be read.
    async fn fetch_pool_state(&self, address: &Pubkey) -> Result<Option<CpAmmPoolState>, VenueError>;

    /// Every pool whose token A is `mint`.
    async fn pools_by_token_a_mint(
        &self,
        mint: &Pubkey,
    ) -> Result<Vec<(Pubkey, CpAmmPoolState)>, VenueError>;

    async fn swap_quote_exact_input(&self, request: CpAmmQuoteRequest) -> Result<VenueQuote, VenueError>;
}
