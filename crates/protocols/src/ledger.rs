//! Ledger reads needed by the resolver: mint decimals, token account
//! balances and the activation clock.

use crate::error::LedgerError;
use async_trait::async_trait;
use mooner_domain::ActivationType;
use solana_sdk::pubkey::Pubkey;

/// Byte offset of `decimals` in an SPL mint account.
const MINT_DECIMALS_OFFSET: usize = 44;
/// Length of the base SPL mint layout. Token-2022 mints carry extensions after it.
const MINT_LEN: usize = 82;
/// Byte range of `amount` in an SPL token account.
const TOKEN_AMOUNT_RANGE: std::ops::Range<usize> = 64..72;
/// Length of the base SPL token account layout.
const TOKEN_ACCOUNT_LEN: usize = 165;

/// Read-only access to ledger accounts.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Decimals of `mint`.
    ///
    /// # Errors
    /// Returns an error if the account is missing or is not a mint.
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, LedgerError>;

    /// Balance in minor units held by the token account at `account`.
    ///
    /// # Errors
    /// Returns an error if the account is missing or is not a token account.
    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, LedgerError>;

    async fn slot(&self) -> Result<u64, LedgerError>;

    /// Unix timestamp of `slot`, if the node knows it.
    async fn block_time(&self, slot: u64) -> Result<Option<i64>, LedgerError>;

    /// Current activation point for a pool: the slot, or the block time of
    /// the current slot (wall clock when unavailable).
    async fn current_point(&self, activation: ActivationType) -> Result<u64, LedgerError> {
        let slot = self.slot().await?;
        match activation {
            ActivationType::Slot => Ok(slot),
            ActivationType::Timestamp => {
                let time = self
                    .block_time(slot)
                    .await?
                    .unwrap_or_else(|| chrono::Utc::now().timestamp());
                Ok(u64::try_from(time).unwrap_or_default())
            }
        }
    }
}

/// Decodes the decimals of a mint account.
///
/// # Errors
/// Returns an error if `data` is shorter than a mint.
pub fn decode_mint_decimals(address: &Pubkey, data: &[u8]) -> Result<u8, LedgerError> {
    if data.len() < MINT_LEN {
        return Err(LedgerError::InvalidAccountData {
            address: *address,
            reason: format!("mint data too short: {} bytes", data.len()),
        });
    }
    Ok(data[MINT_DECIMALS_OFFSET])
}

/// Decodes the amount of a token account.
///
/// # Errors
/// Returns an error if `data` is shorter than a token account.
pub fn decode_token_amount(address: &Pubkey, data: &[u8]) -> Result<u64, LedgerError> {
    if data.len() < TOKEN_ACCOUNT_LEN {
        return Err(LedgerError::InvalidAccountData {
            address: *address,
            reason: format!("token account data too short: {} bytes", data.len()),
        });
    }
    let mut amount = [0u8; 8];
    amount.copy_from_slice(&data[TOKEN_AMOUNT_RANGE]);
    Ok(u64::from_le_bytes(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock {
        slot: u64,
        block_time: Option<i64>,
    }

    #[async_trait]
    impl LedgerReader for FixedClock {
        async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, LedgerError> {
            Err(LedgerError::AccountNotFound(*mint))
        }

        async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, LedgerError> {
            Err(LedgerError::AccountNotFound(*account))
        }

        async fn slot(&self) -> Result<u64, LedgerError> {
            Ok(self.slot)
        }

        async fn block_time(&self, _slot: u64) -> Result<Option<i64>, LedgerError> {
            Ok(self.block_time)
        }
    }

    #[test]
    fn test_decode_mint_decimals() {
        let address = Pubkey::new_unique();
        let mut data = vec![0u8; MINT_LEN];
        data[MINT_DECIMALS_OFFSET] = 6;
        assert_eq!(decode_mint_decimals(&address, &data).unwrap(), 6);
        assert!(decode_mint_decimals(&address, &data[..40]).is_err());
    }

    #[test]
    fn test_decode_token_amount() {
        let address = Pubkey::new_unique();
        let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
        data[TOKEN_AMOUNT_RANGE].copy_from_slice(&1_500_000u64.to_le_bytes());
        assert_eq!(decode_token_amount(&address, &data).unwrap(), 1_500_000);
        assert!(decode_token_amount(&address, &data[..70]).is_err());
    }

    #[tokio::test]
    async fn test_current_point_by_activation_type() {
        let clock = FixedClock {
            slot: 1234,
            block_time: Some(1_700_000_000),
        };
        assert_eq!(clock.current_point(ActivationType::Slot).await.unwrap(), 1234);
        assert_eq!(
            clock.current_point(ActivationType::Timestamp).await.unwrap(),
            1_700_000_000
        );
    }

    #[tokio::test]
    async fn test_current_point_falls_back_to_wall_clock() {
        let clock = FixedClock {
            slot: 1,
            block_time: None,
        };
        let before = chrono::Utc::now().timestamp() as u64;
        let point = clock.current_point(ActivationType::Timestamp).await.unwrap();
        assert!(point >= before);
    }
}
