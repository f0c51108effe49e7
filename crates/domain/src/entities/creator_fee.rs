use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

/// Creator trading fees currently claimable from a bonding-curve pool's fee
/// ledger. Claimable even after the token migrated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimableFees {
    pub base_mint: Pubkey,
    pub pool: Pubkey,
    /// Quote-side fee in minor units.
    pub creator_quote_fee: u64,
    /// Base-side fee in minor units.
    pub creator_base_fee: u64,
    /// Quote fee converted to USD at the configured native price.
    pub quote_fee_usd: Decimal,
    /// Base fee in whole tokens.
    pub base_fee_tokens: Decimal,
    pub has_claimable_fees: bool,
    pub is_creator: bool,
    pub is_migrated: bool,
}

impl ClaimableFees {
    /// Counts toward the totals only when the wallet is the creator and
    /// something is actually claimable.
    pub fn counts_toward_totals(&self) -> bool {
        self.has_claimable_fees && self.is_creator
    }
}

/// Aggregate over a wallet's pools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeTotals {
    pub total_quote_fee_usd: Decimal,
    pub claimable_count: u32,
}

impl FeeTotals {
    pub fn from_fees<'a>(fees: impl IntoIterator<Item = &'a ClaimableFees>) -> Self {
        fees.into_iter()
            .filter(|f| f.counts_toward_totals())
            .fold(Self::default(), |mut acc, f| {
                acc.total_quote_fee_usd += f.quote_fee_usd;
                acc.claimable_count += 1;
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fees(usd: Decimal, claimable: bool, creator: bool) -> ClaimableFees {
        ClaimableFees {
            base_mint: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            creator_quote_fee: 0,
            creator_base_fee: 0,
            quote_fee_usd: usd,
            base_fee_tokens: Decimal::ZERO,
            has_claimable_fees: claimable,
            is_creator: creator,
            is_migrated: false,
        }
    }

    #[test]
    fn test_totals_only_count_creator_pools_with_fees() {
        let all = vec![
            fees(dec!(10), true, true),
            fees(dec!(5), true, false),
            fees(dec!(0), false, true),
            fees(dec!(2.5), true, true),
        ];
        let totals = FeeTotals::from_fees(&all);
        assert_eq!(totals.claimable_count, 2);
        assert_eq!(totals.total_quote_fee_usd, dec!(12.5));
    }
}
