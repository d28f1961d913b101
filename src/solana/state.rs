//! Program account layouts read while building operations
//!
//! All accounts are borsh-encoded without a discriminator. Trailing bytes
//! are ignored.

use borsh::BorshDeserialize;

use crate::error::{BridgeError, Result};

/// Core bridge configuration, stored at the `["Bridge"]` PDA
#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeData {
    pub guardian_set_index: u32,
    /// Lamports in the fee collector at the last fee change
    pub last_lamports: u64,
    pub config: BridgeConfig,
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    pub guardian_set_expiration_time: u32,
    /// Lamports charged per posted message
    pub fee: u64,
}

/// Origin of a bridge-issued mint, stored at the `["meta", mint]` PDA
#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedMeta {
    pub chain: u16,
    pub token_address: [u8; 32],
    pub original_decimals: u8,
}

/// Redemption marker, stored at the claim PDA
#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub claimed: bool,
}

pub fn decode_account<T: BorshDeserialize>(name: &str, data: &[u8]) -> Result<T> {
    T::deserialize(&mut &data[..])
        .map_err(|e| BridgeError::Query(format!("failed to decode {} account: {}", name, e)))
}
