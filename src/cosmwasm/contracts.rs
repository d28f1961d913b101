//! CosmWasm token bridge message definitions
//!
//! Execute and query messages for the token bridge contract and the
//! wrapped-asset CW20 contracts it instantiates. Byte fields travel as
//! base64 (`Binary`), amounts as decimal strings (`Uint128`).

use cosmwasm_std::{Binary, Uint128};
use serde::{Deserialize, Serialize};

// ============================================================================
// Assets
// ============================================================================

/// A bank denomination or a CW20 contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    /// CW20 token
    Token { contract_addr: String },
    /// Bank module denomination
    NativeToken { denom: String },
}

impl AssetInfo {
    pub fn is_native(&self) -> bool {
        matches!(self, AssetInfo::NativeToken { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Uint128,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Publish a token's metadata
    CreateAssetMeta { asset_info: AssetInfo, nonce: u32 },

    /// Credit the attached funds to the sender for a following transfer
    DepositTokens {},

    InitiateTransfer {
        asset: Asset,
        recipient_chain: u16,
        recipient: Binary,
        fee: Uint128,
        nonce: u32,
    },

    InitiateTransferWithPayload {
        asset: Asset,
        recipient_chain: u16,
        recipient: Binary,
        fee: Uint128,
        payload: Binary,
        nonce: u32,
    },

    /// Redeem a signed attestation
    SubmitVaa { data: Binary },
}

// ============================================================================
// Query Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// Local wrapped asset for a foreign token
    WrappedRegistry { chain: u16, address: Binary },
    IsVaaRedeemed { vaa: Binary },
}

/// Query served by bridge-issued CW20 contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrappedQueryMsg {
    WrappedAssetInfo {},
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedRegistryResponse {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsVaaRedeemedResponse {
    pub is_redeemed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedAssetInfoResponse {
    pub asset_chain: u16,
    /// Origin address in the 32-byte layout
    pub asset_address: Binary,
}
