//! Ordered resolution strategies.

use std::fmt;

/// Mint order used when deriving a migrated pool address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    BaseThenQuote,
    QuoteThenBase,
}

/// One way of locating a token's pool. Strategies are tried in order and
/// the first one that finds a pool wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Bonding-curve pool looked up by base mint, unless already migrated.
    BondingCurve,
    /// Migrated pool at a derived address.
    DerivedPair(PairOrder),
    /// First migrated pool whose token A is the base mint.
    TokenAMintSearch,
}

impl ResolutionStrategy {
    /// Bonding curve first, then both derivations, then the search.
    pub fn default_order() -> Vec<ResolutionStrategy> {
        vec![
            ResolutionStrategy::BondingCurve,
            ResolutionStrategy::DerivedPair(PairOrder::BaseThenQuote),
            ResolutionStrategy::DerivedPair(PairOrder::QuoteThenBase),
            ResolutionStrategy::TokenAMintSearch,
        ]
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::BondingCurve => write!(f, "bonding_curve"),
            ResolutionStrategy::DerivedPair(PairOrder::BaseThenQuote) => {
                write!(f, "derived_base_quote")
            }
            ResolutionStrategy::DerivedPair(PairOrder::QuoteThenBase) => {
                write!(f, "derived_quote_base")
            }
            ResolutionStrategy::TokenAMintSearch => write!(f, "token_a_search"),
        }
    }
}
