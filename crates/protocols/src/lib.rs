//! Venue and ledger seams for the launchpad.
//!
//! This crate defines the black-box interfaces the resolver talks to:
//! - Bonding-curve venue client (pool lookup, config, fee metrics, quoting)
//! - Constant-product venue client (address derivation, pool state, quoting)
//! - Ledger reader (mint decimals, token balances, activation clock)
//!
//! It also ships the RPC-backed ledger reader, ledger-backed venue clients
//! that decode pool accounts, and the program-derived address helpers used by
//! the constant-product venue.

/// Prelude module for convenient imports.
pub mod prelude;

/// Program IDs and address derivation.
pub mod addresses;
/// Error types.
pub mod error;
/// Ledger reader trait and account decoding.
pub mod ledger;
/// RPC provider.
pub mod rpc;
/// Venue client traits and account views.
pub mod venues;
