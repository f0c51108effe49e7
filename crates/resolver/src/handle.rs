use mooner_domain::{AssetInfo, Reserves, VenueKind};
use mooner_protocols::venues::{CpAmmPoolState, PoolConfig};
use solana_sdk::pubkey::Pubkey;

/// Venue-specific state kept on a handle for quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueState {
    BondingCurve { config: PoolConfig },
    Migrated {
        pool_state: CpAmmPoolState,
        token_a_is_base: bool,
    },
}

/// The venue currently hosting trading for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolHandle {
    pub venue_kind: VenueKind,
    pub pool_address: Pubkey,
    pub base: AssetInfo,
    pub quote: AssetInfo,
    pub reserves: Reserves,
    /// Quote reserve at which a bonding-curve pool migrates. Zero for
    /// migrated pools.
    pub migration_threshold: u64,
    pub venue_state: VenueState,
}

impl PoolHandle {
    pub fn is_graduated(&self) -> bool {
        self.venue_kind == VenueKind::MigratedPool
    }

    /// Share of the migration threshold already reached, in percent.
    /// Always 100 once graduated.
    pub fn curve_progress_pct(&self) -> u64 {
        if self.is_graduated() {
            return 100;
        }
        if self.migration_threshold == 0 {
            return 0;
        }
        let pct = u128::from(self.reserves.quote) * 100 / u128::from(self.migration_threshold);
        pct.min(100) as u64
    }
}
