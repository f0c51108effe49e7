//! Program IDs and program-derived addresses for the two venues.

use solana_sdk::pubkey::Pubkey;

/// Bonding-curve (dynamic bonding curve) program.
pub const DBC_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("dbcij3LWUppWqq96dh6gJWwBifmcGfLSB5D4DuSMaqN");

/// Constant-product AMM program hosting migrated pools.
pub const CP_AMM_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("cpamdpZCGKUy5JxQXB4dcpGPiikHawvSWAd6mEn1sGG");

/// Wrapped native mint, the default quote asset.
pub fn native_mint() -> Pubkey {
    Pubkey::new_from_array(spl_token::native_mint::ID.to_bytes())
}

const CUSTOMIZABLE_POOL_SEED: &[u8] = b"cpool";
const TOKEN_VAULT_SEED: &[u8] = b"token_vault";

/// Customizable pool address for a mint pair.
///
/// The program orders the two mints by their bytes (larger first) before
/// hashing, so the result does not depend on argument order.
pub fn derive_customizable_pool_address(token_a_mint: &Pubkey, token_b_mint: &Pubkey) -> Pubkey {
    let (first, second) = if token_a_mint.to_bytes() > token_b_mint.to_bytes() {
        (token_a_mint, token_b_mint)
    } else {
        (token_b_mint, token_a_mint)
    };
    Pubkey::find_program_address(
        &[CUSTOMIZABLE_POOL_SEED, first.as_ref(), second.as_ref()],
        &CP_AMM_PROGRAM_ID,
    )
    .0
}

/// Vault holding `mint` for `pool`.
pub fn derive_token_vault_address(mint: &Pubkey, pool: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[TOKEN_VAULT_SEED, mint.as_ref(), pool.as_ref()],
        &CP_AMM_PROGRAM_ID,
    )
    .0
}
