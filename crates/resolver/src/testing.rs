//! In-memory venue and ledger fakes.

use async_trait::async_trait;
use mooner_domain::ActivationType;
use mooner_protocols::error::{LedgerError, VenueError};
use mooner_protocols::ledger::LedgerReader;
use mooner_protocols::venues::{
    BondingCurveQuoteRequest, BondingCurveVenue, CpAmmPoolState, CpAmmQuoteRequest, CpAmmVenue,
    FeeMetrics, PoolConfig, VenueQuote, VirtualPool,
};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeBondingCurve {
    pub pools: HashMap<Pubkey, VirtualPool>,
    pub configs: HashMap<Pubkey, PoolConfig>,
    pub fee_metrics: HashMap<Pubkey, FeeMetrics>,
    pub lookup_error: Option<VenueError>,
    pub quote: Mutex<Option<Result<VenueQuote, VenueError>>>,
    pub lookups: AtomicUsize,
    pub last_request: Mutex<Option<BondingCurveQuoteRequest>>,
    pub quote_gate: Option<Arc<Notify>>,
    pub lookup_gate: Option<Arc<Notify>>,
}

impl FakeBondingCurve {
    /// Adds an active pool for `base_mint` with the given reserves and a
    /// config quoting in `quote_mint`.
    pub fn with_pool(
        mut self,
        base_mint: Pubkey,
        quote_mint: Pubkey,
        base_reserve: u64,
        quote_reserve: u64,
        is_migrated: bool,
    ) -> Self {
        let config = PoolConfig {
            address: Pubkey::new_unique(),
            quote_mint,
            migration_quote_threshold: 85_000_000_000,
            activation_type: ActivationType::Slot,
            creator_trading_fee_percentage: 50,
        };
        let pool = VirtualPool {
            address: Pubkey::new_unique(),
            config: config.address,
            creator: Pubkey::new_unique(),
            base_mint,
            base_reserve,
            quote_reserve,
            is_migrated,
        };
        self.configs.insert(config.address, config);
        self.pools.insert(base_mint, pool);
        self
    }

    /// Holds every pool lookup until `gate` is notified.
    pub fn with_lookup_gate(mut self, gate: Arc<Notify>) -> Self {
        self.lookup_gate = Some(gate);
        self
    }

    /// Holds every swap quote until `gate` is notified.
    pub fn with_quote_gate(mut self, gate: Arc<Notify>) -> Self {
        self.quote_gate = Some(gate);
        self
    }

    pub fn set_quote(&self, quote: Result<VenueQuote, VenueError>) {
        *self.quote.lock().unwrap() = Some(quote);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BondingCurveVenue for FakeBondingCurve {
    async fn pool_by_base_mint(&self, base_mint: &Pubkey) -> Result<Option<VirtualPool>, VenueError> {
        if let Some(gate) = &self.lookup_gate {
            gate.notified().await;
        }
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.lookup_error {
            return Err(err.clone());
        }
        Ok(self.pools.get(base_mint).cloned())
    }

    async fn pool_config(&self, address: &Pubkey) -> Result<Option<PoolConfig>, VenueError> {
        Ok(self.configs.get(address).cloned())
    }

    async fn pool_fee_metrics(&self, pool: &Pubkey) -> Result<Option<FeeMetrics>, VenueError> {
        Ok(self.fee_metrics.get(pool).copied())
    }

    async fn swap_quote(&self, request: BondingCurveQuoteRequest) -> Result<VenueQuote, VenueError> {
        if let Some(gate) = &self.quote_gate {
            gate.notified().await;
        }
        *self.last_request.lock().unwrap() = Some(request);
        self.quote
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(VenueError::Upstream("no quote configured".to_string())))
    }
}

#[derive(Default)]
pub struct FakeCpAmm {
    pub pools: HashMap<Pubkey, CpAmmPoolState>,
    pub failing_addresses: HashSet<Pubkey>,
    pub search_error: Option<VenueError>,
    pub fetched: Mutex<Vec<Pubkey>>,
    pub searches: AtomicUsize,
    pub quote: Mutex<Option<Result<VenueQuote, VenueError>>>,
    pub last_request: Mutex<Option<CpAmmQuoteRequest>>,
}

impl FakeCpAmm {
    /// Adds a pool with the given token order at `address`.
    pub fn with_pool_at(mut self, address: Pubkey, token_a: Pubkey, token_b: Pubkey) -> Self {
        self.pools.insert(
            address,
            CpAmmPoolState {
                token_a_mint: token_a,
                token_b_mint: token_b,
                activation_type: ActivationType::Timestamp,
                sqrt_price: 1 << 64,
                liquidity: 1_000_000,
            },
        );
        self
    }

    /// Adds a pool at the derived address for the pair.
    pub fn with_derived_pool(self, token_a: Pubkey, token_b: Pubkey) -> Self {
        let address = self.derive_pool_address(&token_a, &token_b);
        self.with_pool_at(address, token_a, token_b)
    }

    pub fn set_quote(&self, quote: Result<VenueQuote, VenueError>) {
        *self.quote.lock().unwrap() = Some(quote);
    }

    pub fn fetched(&self) -> Vec<Pubkey> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CpAmmVenue for FakeCpAmm {
    async fn fetch_pool_state(&self, address: &Pubkey) -> Result<Option<CpAmmPoolState>, VenueError> {
        self.fetched.lock().unwrap().push(*address);
        if self.failing_addresses.contains(address) {
            return Err(VenueError::Upstream("account decode failed".to_string()));
        }
        Ok(self.pools.get(address).cloned())
    }

    async fn pools_by_token_a_mint(
        &self,
        mint: &Pubkey,
    ) -> Result<Vec<(Pubkey, CpAmmPoolState)>, VenueError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.search_error {
            return Err(err.clone());
        }
        let mut found: Vec<_> = self
            .pools
            .iter()
            .filter(|(_, state)| state.token_a_mint == *mint)
            .map(|(address, state)| (*address, state.clone()))
            .collect();
        found.sort_by_key(|(address, _)| *address);
        Ok(found)
    }

    async fn swap_quote_exact_input(&self, request: CpAmmQuoteRequest) -> Result<VenueQuote, VenueError> {
        *self.last_request.lock().unwrap() = Some(request);
        self.quote
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(VenueError::Upstream("no quote configured".to_string())))
    }
}

#[derive(Default)]
pub struct FakeLedger {
    pub decimals: HashMap<Pubkey, u8>,
    pub balances: HashMap<Pubkey, u64>,
    pub slot: u64,
    pub block_time: Option<i64>,
}

#[async_trait]
impl LedgerReader for FakeLedger {
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, LedgerError> {
        self.decimals
            .get(mint)
            .copied()
            .ok_or(LedgerError::AccountNotFound(*mint))
    }

    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, LedgerError> {
        self.balances
            .get(account)
            .copied()
            .ok_or(LedgerError::AccountNotFound(*account))
    }

    async fn slot(&self) -> Result<u64, LedgerError> {
        Ok(self.slot)
    }

    async fn block_time(&self, _slot: u64) -> Result<Option<i64>, LedgerError> {
        Ok(self.block_time)
    }
}
