//! Venue clients that read pool accounts straight from the ledger.
//!
//! Pool lookups decode program accounts through [`RpcProvider`]. Swap quotes
//! need each program's curve math, which these clients do not carry, so they
//! report quoting as unavailable.

use super::layout::{
    CP_AMM_TOKEN_A_MINT_OFFSET, CpAmmPoolAccount, PoolConfigAccount, VIRTUAL_POOL_BASE_MINT_OFFSET,
    VirtualPoolAccount, decode_account,
};
use super::{
    BondingCurveQuoteRequest, BondingCurveVenue, CpAmmPoolState, CpAmmQuoteRequest, CpAmmVenue,
    FeeMetrics, PoolConfig, VenueQuote, VirtualPool,
};
use crate::addresses::{CP_AMM_PROGRAM_ID, DBC_PROGRAM_ID};
use crate::error::VenueError;
use crate::rpc::RpcProvider;
use async_trait::async_trait;
use borsh::BorshDeserialize;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::debug;

pub const QUOTE_UNAVAILABLE: &str = "Swap quoting is not available from ledger reads";

/// Decodes `account` when `program` owns it. Accounts owned by anything else
/// are not pools of that program.
fn decode_owned<T: BorshDeserialize>(
    address: &Pubkey,
    account: &Account,
    program: &Pubkey,
) -> Result<Option<T>, VenueError> {
    if account.owner != *program {
        debug!(address = %address, owner = %account.owner, "Account not owned by venue program");
        return Ok(None);
    }
    decode_account(address, &account.data).map(Some)
}

/// Bonding-curve venue backed by ledger reads.
pub struct RpcBondingCurve {
    rpc: Arc<RpcProvider>,
}

impl RpcBondingCurve {
    #[must_use]
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }

    async fn virtual_pool(&self, address: &Pubkey) -> Result<Option<VirtualPoolAccount>, VenueError> {
        match self.rpc.find_account(address).await? {
            Some(account) => decode_owned(address, &account, &DBC_PROGRAM_ID),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl BondingCurveVenue for RpcBondingCurve {
    async fn pool_by_base_mint(&self, base_mint: &Pubkey) -> Result<Option<VirtualPool>, VenueError> {
        let matches = self
            .rpc
            .program_accounts_matching(&DBC_PROGRAM_ID, VIRTUAL_POOL_BASE_MINT_OFFSET, base_mint.as_ref())
            .await?;

        for (address, account) in &matches {
            match decode_owned::<VirtualPoolAccount>(address, account, &DBC_PROGRAM_ID) {
                Ok(Some(pool)) => return Ok(Some(pool.to_view(*address))),
                Ok(None) => {}
                Err(e) => debug!(address = %address, error = %e, "Skipping undecodable pool account"),
            }
        }
        Ok(None)
    }

    async fn pool_config(&self, address: &Pubkey) -> Result<Option<PoolConfig>, VenueError> {
        let Some(account) = self.rpc.find_account(address).await? else {
            return Ok(None);
        };
        Ok(decode_owned::<PoolConfigAccount>(address, &account, &DBC_PROGRAM_ID)?
            .map(|config| config.to_view(*address)))
    }

    async fn pool_fee_metrics(&self, pool: &Pubkey) -> Result<Option<FeeMetrics>, VenueError> {
        Ok(self
            .virtual_pool(pool)
            .await?
            .map(|account| account.fee_metrics()))
    }

    async fn swap_quote(&self, _request: BondingCurveQuoteRequest) -> Result<VenueQuote, VenueError> {
        Err(VenueError::Upstream(QUOTE_UNAVAILABLE.to_string()))
    }
}

/// Constant-product venue backed by ledger reads.
pub struct RpcCpAmm {
    rpc: Arc<RpcProvider>,
}

impl RpcCpAmm {
    #[must_use]
    pub fn new(rpc: Arc<RpcProvider>) -> Self {
        Self { rpc }
    }
}

/// Decodes search results, skipping accounts that are not pools. Sorted by
/// address so repeated searches agree on the first pool.
fn decode_pools(accounts: &[(Pubkey, Account)]) -> Vec<(Pubkey, CpAmmPoolState)> {
    let mut pools: Vec<_> = accounts
        .iter()
        .filter_map(|(address, account)| {
            match decode_owned::<CpAmmPoolAccount>(address, account, &CP_AMM_PROGRAM_ID) {
                Ok(pool) => pool.map(|pool| (*address, pool.to_state())),
                Err(e) => {
                    debug!(address = %address, error = %e, "Skipping undecodable pool account");
                    None
                }
            }
        })
        .collect();
    pools.sort_by_key(|(address, _)| *address);
    pools
}

#[async_trait]
impl CpAmmVenue for RpcCpAmm {
    async fn fetch_pool_state(&self, address: &Pubkey) -> Result<Option<CpAmmPoolState>, VenueError> {
        let Some(account) = self.rpc.find_account(address).await? else {
            return Ok(None);
        };
        Ok(decode_owned::<CpAmmPoolAccount>(address, &account, &CP_AMM_PROGRAM_ID)?
            .map(|pool| pool.to_state()))
    }

    async fn pools_by_token_a_mint(
        &self,
        mint: &Pubkey,
    ) -> Result<Vec<(Pubkey, CpAmmPoolState)>, VenueError> {
        let accounts = self
            .rpc
            .program_accounts_matching(&CP_AMM_PROGRAM_ID, CP_AMM_TOKEN_A_MINT_OFFSET, mint.as_ref())
            .await?;
        Ok(decode_pools(&accounts))
    }

    async fn swap_quote_exact_input(&self, _request: CpAmmQuoteRequest) -> Result<VenueQuote, VenueError> {
        Err(VenueError::Upstream(QUOTE_UNAVAILABLE.to_string()))
    }
}
