//! Solana RPC access
//!
//! The builders need three reads: a recent blockhash, the rent-exempt
//! minimum for a new account, and raw account data. [`SolanaRpc`] is that
//! capability set; [`SolanaRpcClient`] implements it over JSON-RPC.

use async_trait::async_trait;
use eyre::{eyre, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey};
use tracing::info;

/// Read-only Solana chain access used during operation construction
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    /// Raw account data, `None` when the account does not exist
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Nonblocking JSON-RPC client
pub struct SolanaRpcClient {
    rpc: RpcClient,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: &str) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        info!(rpc_url = %rpc_url, commitment = ?commitment.commitment, "Created Solana RPC client");
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
        }
    }
}

#[async_trait]
impl SolanaRpc for SolanaRpcClient {
    async fn latest_blockhash(&self) -> Result<Hash> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| eyre!("Failed to get latest blockhash: {}", e))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| eyre!("Failed to get rent exemption minimum: {}", e))
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(|e| eyre!("Failed to get account {}: {}", address, e))?;
        Ok(response.value.map(|account| account.data))
    }
}
