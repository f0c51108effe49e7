//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use mooner_protocols::prelude::*;
//! ```

pub use crate::addresses::{
    CP_AMM_PROGRAM_ID, DBC_PROGRAM_ID, derive_customizable_pool_address,
    derive_token_vault_address, native_mint,
};
pub use crate::error::{LedgerError, VenueError};
pub use crate::ledger::LedgerReader;
pub use crate::rpc::{RpcConfig, RpcProvider};
pub use crate::venues::{
    BondingCurveQuoteRequest, BondingCurveVenue, CpAmmPoolState, CpAmmQuoteRequest, CpAmmVenue,
    FeeMetrics, PoolConfig, RpcBondingCurve, RpcCpAmm, VenueQuote, VirtualPool,
};
