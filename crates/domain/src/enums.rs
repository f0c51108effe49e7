use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue currently hosting trading for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueKind {
    /// Early-stage bonding-curve pool.
    BondingCurve,
    /// Constant-product pool the token graduated into.
    MigratedPool,
}

impl VenueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueKind::BondingCurve => "bonding-curve",
            VenueKind::MigratedPool => "cpamm",
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade direction from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Spend the quote asset, receive the base asset.
    Buy,
    /// Spend the base asset, receive the quote asset.
    Sell,
}

impl TradeDirection {
    /// Bonding-curve venues express direction as "swap base for quote".
    pub fn swap_base_for_quote(&self) -> bool {
        matches!(self, TradeDirection::Sell)
    }

    /// Side of the pool the input amount is denominated in.
    pub fn input_side(&self) -> ReserveSide {
        match self {
            TradeDirection::Buy => ReserveSide::Quote,
            TradeDirection::Sell => ReserveSide::Base,
        }
    }
}

/// One side of a base/quote pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReserveSide {
    Base,
    Quote,
}

impl fmt::Display for ReserveSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveSide::Base => f.write_str("base"),
            ReserveSide::Quote => f.write_str("quote"),
        }
    }
}

/// Clock a pool's activation and fee schedule is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationType {
    Slot,
    Timestamp,
}

impl ActivationType {
    /// Maps the on-chain discriminant (0 = slot, anything else = timestamp).
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            ActivationType::Slot
        } else {
            ActivationType::Timestamp
        }
    }
}

/// Upstream a listing row was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceOrigin {
    /// Time-windowed aggregator feed (recently active tokens only).
    LiveFeed,
    /// Persistent store covering every token ever created.
    HistoricalStore,
}

/// Which historical rows a category admits when backfilling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoricalBackfill {
    NotMigrated,
    Migrated,
    None,
}

impl HistoricalBackfill {
    pub fn admits(&self, is_migrated: bool) -> bool {
        match self {
            HistoricalBackfill::NotMigrated => !is_migrated,
            HistoricalBackfill::Migrated => is_migrated,
            HistoricalBackfill::None => false,
        }
    }
}

/// Discovery column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingCategory {
    New,
    AboutToGraduate,
    Graduated,
}

impl ListingCategory {
    pub const ALL: [ListingCategory; 3] = [
        ListingCategory::New,
        ListingCategory::AboutToGraduate,
        ListingCategory::Graduated,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ListingCategory::New => "New",
            ListingCategory::AboutToGraduate => "Soon",
            ListingCategory::Graduated => "Bonded",
        }
    }

    /// About-to-graduate rows are always recent, so only the other two
    /// columns are backfilled from the historical store.
    pub fn backfill(&self) -> HistoricalBackfill {
        match self {
            ListingCategory::New => HistoricalBackfill::NotMigrated,
            ListingCategory::AboutToGraduate => HistoricalBackfill::None,
            ListingCategory::Graduated => HistoricalBackfill::Migrated,
        }
    }
}

/// Numeric or timestamp field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    CreatedAt,
    GraduatedAt,
    MarketCap,
    Price,
    Volume24h,
    Liquidity,
    HolderCount,
    BondingCurve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}
