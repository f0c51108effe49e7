//! On-chain account layouts of the two venue programs.
//!
//! Only the leading fields the resolver reads are declared; Borsh reads the
//! prefix and ignores the trailing bytes. Keys are kept as raw byte arrays.

use super::{CpAmmPoolState, FeeMetrics, PoolConfig, VirtualPool};
use crate::error::VenueError;
use borsh::{BorshDeserialize, BorshSerialize};
use mooner_domain::ActivationType;
use solana_sdk::pubkey::Pubkey;

/// Offset of `base_mint` in a bonding-curve pool account.
pub const VIRTUAL_POOL_BASE_MINT_OFFSET: usize = 136;
/// Offset of `token_a_mint` in a constant-product pool account.
pub const CP_AMM_TOKEN_A_MINT_OFFSET: usize = 168;

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Default)]
pub struct VirtualPoolAccount {
    pub discriminator: [u8; 8],
    pub volatility_tracker: [u64; 8],
    pub config: [u8; 32],
    pub creator: [u8; 32],
    pub base_mint: [u8; 32],
    pub base_vault: [u8; 32],
    pub quote_vault: [u8; 32],
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub protocol_base_fee: u64,
    pub protocol_quote_fee: u64,
    pub partner_base_fee: u64,
    pub partner_quote_fee: u64,
    pub sqrt_price: u128,
    pub activation_point: u64,
    pub pool_type: u8,
    pub is_migrated: u8,
    pub withdraw_flags: [u8; 6],
    pub metrics: [u64; 4],
    pub finish_curve_timestamp: u64,
    pub creator_base_fee: u64,
    pub creator_quote_fee: u64,
}

impl VirtualPoolAccount {
    pub fn to_view(&self, address: Pubkey) -> VirtualPool {
        VirtualPool {
            address,
            config: Pubkey::new_from_array(self.config),
            creator: Pubkey::new_from_array(self.creator),
            base_mint: Pubkey::new_from_array(self.base_mint),
            base_reserve: self.base_reserve,
            quote_reserve: self.quote_reserve,
            is_migrated: self.is_migrated != 0,
        }
    }

    pub fn fee_metrics(&self) -> FeeMetrics {
        FeeMetrics {
            creator_quote_fee: self.creator_quote_fee,
            creator_base_fee: self.creator_base_fee,
        }
    }
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone)]
pub struct PoolConfigAccount {
    pub discriminator: [u8; 8],
    pub quote_mint: [u8; 32],
    pub fee_claimer: [u8; 32],
    pub leftover_receiver: [u8; 32],
    pub pool_fees: [u8; 128],
    pub collect_fee_mode: u8,
    pub migration_option: u8,
    pub activation_type: u8,
    pub token_decimal: u8,
    pub version: u8,
    pub token_type: u8,
    pub quote_token_flag: u8,
    pub partner_locked_lp_percentage: u8,
    pub partner_lp_percentage: u8,
    pub creator_locked_lp_percentage: u8,
    pub creator_lp_percentage: u8,
    pub migration_fee_option: u8,
    pub fixed_token_supply_flag: u8,
    pub creator_trading_fee_percentage: u8,
    pub token_update_authority: u8,
    pub migration_fee_percentage: u8,
    pub creator_migration_fee_percentage: u8,
    pub padding: [u8; 7],
    pub swap_base_amount: u64,
    pub migration_quote_threshold: u64,
}

impl PoolConfigAccount {
    pub fn to_view(&self, address: Pubkey) -> PoolConfig {
        PoolConfig {
            address,
            quote_mint: Pubkey::new_from_array(self.quote_mint),
            migration_quote_threshold: self.migration_quote_threshold,
            activation_type: ActivationType::from_raw(self.activation_type),
            creator_trading_fee_percentage: self.creator_trading_fee_percentage,
        }
    }
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone)]
pub struct CpAmmPoolAccount {
    pub discriminator: [u8; 8],
    pub pool_fees: [u8; 160],
    pub token_a_mint: [u8; 32],
    pub token_b_mint: [u8; 32],
    pub token_a_vault: [u8; 32],
    pub token_b_vault: [u8; 32],
    pub whitelisted_vault: [u8; 32],
    pub partner: [u8; 32],
    pub liquidity: u128,
    pub padding: u128,
    pub protocol_a_fee: u64,
    pub protocol_b_fee: u64,
    pub partner_a_fee: u64,
    pub partner_b_fee: u64,
    pub sqrt_min_price: u128,
    pub sqrt_max_price: u128,
    pub sqrt_price: u128,
    pub activation_point: u64,
    pub activation_type: u8,
    pub pool_status: u8,
}

impl CpAmmPoolAccount {
    pub fn to_state(&self) -> CpAmmPoolState {
        CpAmmPoolState {
            token_a_mint: Pubkey::new_from_array(self.token_a_mint),
            token_b_mint: Pubkey::new_from_array(self.token_b_mint),
            activation_type: ActivationType::from_raw(self.activation_type),
            sqrt_price: self.sqrt_price,
            liquidity: self.liquidity,
        }
    }
}

/// Decodes the leading fields of an account.
///
/// # Errors
/// Returns an error if `data` is shorter than the declared layout.
pub fn decode_account<T: BorshDeserialize>(address: &Pubkey, data: &[u8]) -> Result<T, VenueError> {
    let mut buf = data;
    T::deserialize(&mut buf).map_err(|e| {
        VenueError::Upstream(format!("Invalid account data for {address}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: BorshSerialize>(account: &T, trailing: usize) -> Vec<u8> {
        let mut data = borsh::to_vec(account).unwrap();
        data.resize(data.len() + trailing, 0xAB);
        data
    }

    fn config_account(activation_type: u8) -> PoolConfigAccount {
        PoolConfigAccount {
            discriminator: [1; 8],
            quote_mint: [3; 32],
            fee_claimer: [0; 32],
            leftover_receiver: [0; 32],
            pool_fees: [0; 128],
            collect_fee_mode: 0,
            migration_option: 1,
            activation_type,
            token_decimal: 6,
            version: 0,
            token_type: 0,
            quote_token_flag: 0,
            partner_locked_lp_percentage: 0,
            partner_lp_percentage: 0,
            creator_locked_lp_percentage: 0,
            creator_lp_percentage: 0,
            migration_fee_option: 0,
            fixed_token_supply_flag: 0,
            creator_trading_fee_percentage: 50,
            token_update_authority: 0,
            migration_fee_percentage: 0,
            creator_migration_fee_percentage: 0,
            padding: [0; 7],
            swap_base_amount: 0,
            migration_quote_threshold: 85_000_000_000,
        }
    }

    #[test]
    fn test_virtual_pool_decode() {
        let account = VirtualPoolAccount {
            config: [1; 32],
            creator: [2; 32],
            base_mint: [9; 32],
            base_reserve: 1_000_000,
            quote_reserve: 2_500,
            is_migrated: 1,
            creator_base_fee: 7,
            creator_quote_fee: 11,
            ..Default::default()
        };
        let data = encode(&account, 64);
        let address = Pubkey::new_unique();

        assert_eq!(
            &data[VIRTUAL_POOL_BASE_MINT_OFFSET..VIRTUAL_POOL_BASE_MINT_OFFSET + 32],
            &[9; 32]
        );

        let decoded: VirtualPoolAccount = decode_account(&address, &data).unwrap();
        let pool = decoded.to_view(address);
        assert_eq!(pool.base_mint, Pubkey::new_from_array([9; 32]));
        assert_eq!(pool.config, Pubkey::new_from_array([1; 32]));
        assert_eq!(pool.quote_reserve, 2_500);
        assert!(pool.is_migrated);
        assert_eq!(decoded.fee_metrics().creator_quote_fee, 11);
    }

    #[test]
    fn test_pool_config_decode() {
        let address = Pubkey::new_unique();
        let data = encode(&config_account(1), 32);

        let config = decode_account::<PoolConfigAccount>(&address, &data)
            .unwrap()
            .to_view(address);

        assert_eq!(config.quote_mint, Pubkey::new_from_array([3; 32]));
        assert_eq!(config.activation_type, ActivationType::Timestamp);
        assert_eq!(config.migration_quote_threshold, 85_000_000_000);
        assert_eq!(config.creator_trading_fee_percentage, 50);
    }

    #[test]
    fn test_cp_amm_pool_decode() {
        let account = CpAmmPoolAccount {
            discriminator: [0; 8],
            pool_fees: [0; 160],
            token_a_mint: [4; 32],
            token_b_mint: [5; 32],
            token_a_vault: [0; 32],
            token_b_vault: [0; 32],
            whitelisted_vault: [0; 32],
            partner: [0; 32],
            liquidity: u128::MAX,
            padding: 0,
            protocol_a_fee: 0,
            protocol_b_fee: 0,
            partner_a_fee: 0,
            partner_b_fee: 0,
            sqrt_min_price: 1,
            sqrt_max_price: u128::MAX,
            sqrt_price: 1 << 64,
            activation_point: 0,
            activation_type: 0,
            pool_status: 0,
        };
        let data = encode(&account, 128);

        assert_eq!(
            &data[CP_AMM_TOKEN_A_MINT_OFFSET..CP_AMM_TOKEN_A_MINT_OFFSET + 32],
            &[4; 32]
        );

        let state = decode_account::<CpAmmPoolAccount>(&Pubkey::new_unique(), &data)
            .unwrap()
            .to_state();
        assert_eq!(state.token_b_mint, Pubkey::new_from_array([5; 32]));
        assert_eq!(state.activation_type, ActivationType::Slot);
        assert_eq!(state.sqrt_price, 1 << 64);
        assert_eq!(state.liquidity, u128::MAX);
    }

    #[test]
    fn test_truncated_account_is_an_error() {
        let data = encode(&config_account(0), 0);
        let err = decode_account::<PoolConfigAccount>(&Pubkey::new_unique(), &data[..100]);
        assert!(matches!(err, Err(VenueError::Upstream(_))));
    }
}
