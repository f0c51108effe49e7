//! Token to pool resolution.

use crate::config::ResolverConfig;
use crate::handle::{PoolHandle, VenueState};
use crate::strategy::{PairOrder, ResolutionStrategy};
use mooner_domain::entities::asset::{BASE_DECIMALS_FALLBACK, QUOTE_DECIMALS_FALLBACK};
use mooner_domain::{AssetInfo, ReserveSide, ResolveError, Reserves, VenueKind};
use mooner_protocols::addresses::native_mint;
use mooner_protocols::ledger::LedgerReader;
use mooner_protocols::venues::{BondingCurveVenue, CpAmmPoolState, CpAmmVenue};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves tokens to their authoritative pool.
///
/// Lookups are issued sequentially and stop at the first strategy that finds
/// a pool.
pub struct PoolResolver {
    pub(crate) bonding_curve: Arc<dyn BondingCurveVenue>,
    pub(crate) cp_amm: Arc<dyn CpAmmVenue>,
    pub(crate) ledger: Arc<dyn LedgerReader>,
    config: ResolverConfig,
    strategies: Vec<ResolutionStrategy>,
}

impl PoolResolver {
    /// Creates a resolver using the default strategy order.
    #[must_use]
    pub fn new(
        bonding_curve: Arc<dyn BondingCurveVenue>,
        cp_amm: Arc<dyn CpAmmVenue>,
        ledger: Arc<dyn LedgerReader>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            bonding_curve,
            cp_amm,
            ledger,
            config,
            strategies: ResolutionStrategy::default_order(),
        }
    }

    /// Replaces the strategy order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<ResolutionStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn strategies(&self) -> &[ResolutionStrategy] {
        &self.strategies
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a token given as a base58 mint address.
    ///
    /// # Errors
    /// Returns `InvalidTokenId` for a malformed address, otherwise see
    /// [`PoolResolver::resolve_mint`].
    pub async fn resolve(&self, token_id: &str) -> Result<PoolHandle, ResolveError> {
        let mint = Pubkey::from_str(token_id)
            .map_err(|_| ResolveError::InvalidTokenId(token_id.to_string()))?;
        self.resolve_mint(&mint).await
    }

    /// Resolves `base_mint` by trying each strategy in order.
    ///
    /// # Errors
    /// Returns `NotFound` when no strategy finds a pool, `ConfigMissing` when
    /// a bonding-curve pool has no config, and `UpstreamUnavailable` when a
    /// venue lookup or search fails.
    pub async fn resolve_mint(&self, base_mint: &Pubkey) -> Result<PoolHandle, ResolveError> {
        let mut tried = Vec::new();

        for strategy in &self.strategies {
            debug!(mint = %base_mint, strategy = %strategy, "Trying resolution strategy");
            let found = match strategy {
                ResolutionStrategy::BondingCurve => self.try_bonding_curve(base_mint).await?,
                ResolutionStrategy::DerivedPair(order) => {
                    self.try_derived_pair(base_mint, *order, &mut tried).await
                }
                ResolutionStrategy::TokenAMintSearch => self.try_token_a_search(base_mint).await?,
            };

            if let Some(handle) = found {
                info!(
                    mint = %base_mint,
                    pool = %handle.pool_address,
                    venue = %handle.venue_kind,
                    strategy = %strategy,
                    "Resolved pool"
                );
                return Ok(handle);
            }
        }

        debug!(mint = %base_mint, "No pool found on either venue");
        Err(ResolveError::NotFound)
    }

    async fn try_bonding_curve(&self, base_mint: &Pubkey) -> Result<Option<PoolHandle>, ResolveError> {
        let pool = self
            .bonding_curve
            .pool_by_base_mint(base_mint)
            .await
            .map_err(|e| ResolveError::UpstreamUnavailable(e.to_string()))?;

        let Some(pool) = pool else {
            return Ok(None);
        };
        if pool.is_migrated {
            debug!(mint = %base_mint, pool = %pool.address, "Bonding-curve pool already migrated");
            return Ok(None);
        }

        let config = self
            .bonding_curve
            .pool_config(&pool.config)
            .await
            .map_err(|e| ResolveError::UpstreamUnavailable(e.to_string()))?
            .ok_or(ResolveError::ConfigMissing)?;

        let (base, quote) = self.assets(base_mint, &config.quote_mint).await;

        Ok(Some(PoolHandle {
            venue_kind: VenueKind::BondingCurve,
            pool_address: pool.address,
            base,
            quote,
            reserves: Reserves::new(pool.base_reserve, pool.quote_reserve),
            migration_threshold: config.migration_quote_threshold,
            venue_state: VenueState::BondingCurve { config },
        }))
    }

    /// A failed fetch at a derived address is a miss, not an error.
    async fn try_derived_pair(
        &self,
        base_mint: &Pubkey,
        order: PairOrder,
        tried: &mut Vec<Pubkey>,
    ) -> Option<PoolHandle> {
        let quote_mint = &self.config.quote_mint;
        let address = match order {
            PairOrder::BaseThenQuote => self.cp_amm.derive_pool_address(base_mint, quote_mint),
            PairOrder::QuoteThenBase => self.cp_amm.derive_pool_address(quote_mint, base_mint),
        };

        // Derivations that collapse to an address already fetched are skipped.
        if tried.contains(&address) {
            debug!(mint = %base_mint, pool = %address, "Derived address already tried");
            return None;
        }
        tried.push(address);

        match self.cp_amm.fetch_pool_state(&address).await {
            Ok(Some(state)) => Some(self.migrated_handle(base_mint, address, state).await),
            Ok(None) => None,
            Err(e) => {
                debug!(mint = %base_mint, pool = %address, error = %e, "Derived pool fetch failed");
                None
            }
        }
    }

    async fn try_token_a_search(&self, base_mint: &Pubkey) -> Result<Option<PoolHandle>, ResolveError> {
        let pools = self
            .cp_amm
            .pools_by_token_a_mint(base_mint)
            .await
            .map_err(|e| ResolveError::UpstreamUnavailable(e.to_string()))?;

        match pools.into_iter().next() {
            Some((address, state)) => Ok(Some(self.migrated_handle(base_mint, address, state).await)),
            None => Ok(None),
        }
    }

    async fn migrated_handle(
        &self,
        base_mint: &Pubkey,
        pool_address: Pubkey,
        pool_state: CpAmmPoolState,
    ) -> PoolHandle {
        let token_a_is_base = pool_state.is_token_a(base_mint);
        let quote_mint = if token_a_is_base {
            pool_state.token_b_mint
        } else {
            pool_state.token_a_mint
        };

        let (base, quote) = self.assets(base_mint, &quote_mint).await;

        let vault_a = self
            .cp_amm
            .derive_vault_address(&pool_state.token_a_mint, &pool_address);
        let vault_b = self
            .cp_amm
            .derive_vault_address(&pool_state.token_b_mint, &pool_address);
        let (base_vault, quote_vault) = if token_a_is_base {
            (vault_a, vault_b)
        } else {
            (vault_b, vault_a)
        };

        let reserves = Reserves::new(
            self.vault_balance(&base_vault, ReserveSide::Base).await,
            self.vault_balance(&quote_vault, ReserveSide::Quote).await,
        );
        if reserves.has_empty_side() {
            warn!(
                pool = %pool_address,
                base = reserves.base,
                quote = reserves.quote,
                "Migrated pool has an empty reserve side"
            );
        }

        PoolHandle {
            venue_kind: VenueKind::MigratedPool,
            pool_address,
            base,
            quote,
            reserves,
            migration_threshold: 0,
            venue_state: VenueState::Migrated {
                pool_state,
                token_a_is_base,
            },
        }
    }

    /// Reads one vault. A failed read counts as an empty side.
    async fn vault_balance(&self, vault: &Pubkey, side: ReserveSide) -> u64 {
        match self.ledger.token_account_balance(vault).await {
            Ok(amount) => amount,
            Err(e) => {
                let err = ResolveError::PartialReserveRead {
                    side,
                    reason: e.to_string(),
                };
                debug!(vault = %vault, error = %err, "Treating reserve as zero");
                0
            }
        }
    }

    async fn assets(&self, base_mint: &Pubkey, quote_mint: &Pubkey) -> (AssetInfo, AssetInfo) {
        let quote_symbol = if *quote_mint == native_mint() {
            "SOL"
        } else {
            "QUOTE"
        };
        let quote = AssetInfo::new(
            *quote_mint,
            quote_symbol,
            self.decimals(quote_mint).await,
            QUOTE_DECIMALS_FALLBACK,
        );
        let base = AssetInfo::new(
            *base_mint,
            self.config.base_symbol.clone(),
            self.decimals(base_mint).await,
            BASE_DECIMALS_FALLBACK,
        );
        (base, quote)
    }

    async fn decimals(&self, mint: &Pubkey) -> Option<u8> {
        match self.ledger.mint_decimals(mint).await {
            Ok(decimals) => Some(decimals),
            Err(e) => {
                debug!(mint = %mint, error = %e, "Mint decimals unavailable, using fallback");
                None
            }
        }
    }
}
