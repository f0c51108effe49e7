use solana_client::client_error::ClientError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error reported by a venue client.
///
/// Two upstream conditions are benign and get their own variants so callers
/// can clear a quote without surfacing anything.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VenueError {
    /// The input amount is too small to produce any output.
    #[error("Amount out must be greater than 0")]
    ZeroOutput,

    /// Swapping is currently disabled on the pool.
    #[error("Swap is disabled")]
    SwapDisabled,

    #[error("{0}")]
    Upstream(String),
}

impl VenueError {
    /// Classifies a raw upstream message. Clients that only surface strings
    /// should build their errors through this.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("Amount out must be greater than 0") {
            VenueError::ZeroOutput
        } else if message.contains("Swap is disabled") {
            VenueError::SwapDisabled
        } else {
            VenueError::Upstream(message)
        }
    }

    pub fn is_benign(&self) -> bool {
        matches!(self, VenueError::ZeroOutput | VenueError::SwapDisabled)
    }
}

impl From<ClientError> for VenueError {
    fn from(err: ClientError) -> Self {
        VenueError::from_message(err.to_string())
    }
}

/// Error reading ledger accounts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Invalid account data for {address}: {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },
}

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        LedgerError::Rpc(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_classifies_benign_errors() {
        assert_eq!(
            VenueError::from_message("Error: Amount out must be greater than 0"),
            VenueError::ZeroOutput
        );
        assert_eq!(
            VenueError::from_message("Swap is disabled"),
            VenueError::SwapDisabled
        );
        assert!(VenueError::ZeroOutput.is_benign());
        assert!(VenueError::SwapDisabled.is_benign());
    }

    #[test]
    fn test_from_message_keeps_other_errors() {
        let err = VenueError::from_message("blockhash not found");
        assert_eq!(err, VenueError::Upstream("blockhash not found".to_string()));
        assert!(!err.is_benign());
    }
}
