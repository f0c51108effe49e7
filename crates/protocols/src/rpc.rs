//! RPC-backed ledger reader.

use crate::error::LedgerError;
use crate::ledger::{LedgerReader, decode_mint_decimals, decode_token_amount};
use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::account::Account;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::debug;

/// Configuration for the RPC provider.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RpcConfig {
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Reads ledger accounts over JSON-RPC at `confirmed` commitment.
pub struct RpcProvider {
    client: RpcClient,
    config: RpcConfig,
}

impl RpcProvider {
    /// Creates a provider. No request is made until the first read.
    #[must_use]
    pub fn new(config: RpcConfig) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            config.url.clone(),
            config.timeout,
            CommitmentConfig::confirmed(),
        );
        Self { client, config }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetches an account, mapping a missing account to `AccountNotFound`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the account does not exist.
    pub async fn get_account(&self, address: &Pubkey) -> Result<Account, LedgerError> {
        self.find_account(address)
            .await?
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    /// Fetches an account that may not exist.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn find_account(&self, address: &Pubkey) -> Result<Option<Account>, ClientError> {
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await?;
        Ok(response.value)
    }

    /// Accounts of `program` holding `bytes` at `offset`.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn program_accounts_matching(
        &self,
        program: &Pubkey,
        offset: usize,
        bytes: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>, ClientError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                offset, bytes,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts = self
            .client
            .get_program_accounts_with_config(program, config)
            .await?;
        debug!(program = %program, offset, matches = accounts.len(), "Program account search");
        Ok(accounts)
    }
}

#[async_trait]
impl LedgerReader for RpcProvider {
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, LedgerError> {
        let account = self.get_account(mint).await?;
        let decimals = decode_mint_decimals(mint, &account.data)?;
        debug!(mint = %mint, decimals, "Read mint decimals");
        Ok(decimals)
    }

    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, LedgerError> {
        let data = self.get_account(account).await?.data;
        decode_token_amount(account, &data)
    }

    async fn slot(&self) -> Result<u64, LedgerError> {
        Ok(self.client.get_slot().await?)
    }

    async fn block_time(&self, slot: u64) -> Result<Option<i64>, LedgerError> {
        match self.client.get_block_time(slot).await {
            Ok(time) => Ok(Some(time)),
            Err(e) => {
                debug!(slot, error = %e, "Block time unavailable");
                Ok(None)
            }
        }
    }
}
