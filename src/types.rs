//! Common types for cross-chain operations
//!
//! Identities, transfer requests and the unsigned operations the per-family
//! builders hand back to the caller for signing.

use alloy::rpc::types::TransactionRequest;
use cosmrs::cosmwasm::MsgExecuteContract;
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, transaction::Transaction};
use std::fmt;

use crate::amount::{denormalize_amount, normalize_amount};
use crate::chain::{ChainFamily, ChainId};
use crate::error::{BridgeError, Result};

// ============================================================================
// Token Identity
// ============================================================================

/// Chain-independent identity of a token: its origin chain plus a 32-byte
/// address in the protocol's canonical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub chain: ChainId,
    pub address: [u8; 32],
}

impl TokenIdentity {
    pub fn new(chain: ChainId, address: [u8; 32]) -> Self {
        Self { chain, address }
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }
}

impl fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.to_hex())
    }
}

/// Where a token on some chain originally came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedAssetMeta {
    pub origin_chain: ChainId,
    pub origin_address: [u8; 32],
    /// False when the token is native to the chain it was looked up on
    pub is_wrapped: bool,
}

impl WrappedAssetMeta {
    /// A token that is its own origin
    pub fn native(identity: TokenIdentity) -> Self {
        Self {
            origin_chain: identity.chain,
            origin_address: identity.address,
            is_wrapped: false,
        }
    }

    pub fn wrapped(origin_chain: ChainId, origin_address: [u8; 32]) -> Self {
        Self {
            origin_chain,
            origin_address,
            is_wrapped: true,
        }
    }

    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity::new(self.origin_chain, self.origin_address)
    }
}

// ============================================================================
// Transfer Request / Intent
// ============================================================================

/// Caller-facing transfer parameters, amounts in the asset's native units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub amount: u128,
    pub recipient_chain: ChainId,
    /// Recipient in the 32-byte protocol layout
    pub recipient: [u8; 32],
    pub relayer_fee: u128,
    /// Arbitrary bytes delivered to the recipient (payload transfer)
    pub payload: Option<Vec<u8>>,
    pub nonce: u32,
}

impl TransferRequest {
    pub fn new(amount: u128, recipient_chain: ChainId, recipient: [u8; 32]) -> Self {
        Self {
            amount,
            recipient_chain,
            recipient,
            relayer_fee: 0,
            payload: None,
            nonce: 0,
        }
    }

    pub fn with_relayer_fee(mut self, relayer_fee: u128) -> Self {
        self.relayer_fee = relayer_fee;
        self
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    /// Validate and convert to wire precision for an asset with `decimals`
    pub fn into_intent(self, decimals: u8) -> Result<TransferIntent> {
        if self.relayer_fee > self.amount {
            return Err(BridgeError::InvalidAmount(format!(
                "relayer fee {} exceeds amount {}",
                self.relayer_fee, self.amount
            )));
        }
        if self.payload.is_some() && self.relayer_fee != 0 {
            return Err(BridgeError::InvalidAmount(
                "payload transfers do not carry a relayer fee".to_string(),
            ));
        }

        let amount = normalize_amount(self.amount, decimals);
        if amount == 0 {
            return Err(BridgeError::InvalidAmount(format!(
                "amount {} truncates to zero at {} decimals",
                self.amount, decimals
            )));
        }

        Ok(TransferIntent {
            amount,
            recipient_chain: self.recipient_chain,
            recipient: self.recipient,
            relayer_fee: normalize_amount(self.relayer_fee, decimals),
            payload: self.payload,
            nonce: self.nonce,
            decimals,
        })
    }
}

/// Transfer parameters in wire precision (at most 8 decimals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub amount: u128,
    pub recipient_chain: ChainId,
    pub recipient: [u8; 32],
    pub relayer_fee: u128,
    pub payload: Option<Vec<u8>>,
    pub nonce: u32,
    /// On-chain decimals of the asset being sent
    pub decimals: u8,
}

impl TransferIntent {
    /// Amount in native units with dust removed
    pub fn native_amount(&self) -> Result<u128> {
        denormalize_amount(self.amount, self.decimals)
    }

    /// Relayer fee in native units with dust removed
    pub fn native_relayer_fee(&self) -> Result<u128> {
        denormalize_amount(self.relayer_fee, self.decimals)
    }
}

// ============================================================================
// Unsigned Operations
// ============================================================================

/// A single Solana transaction carrying every instruction of one operation
///
/// The transaction is partially signed by the ephemeral keys listed in
/// `co_signers`; the fee payer signature is left to the caller.
#[derive(Debug, Clone)]
pub struct SolanaOperation {
    pub instructions: Vec<Instruction>,
    pub transaction: Transaction,
    pub co_signers: Vec<Pubkey>,
}

/// Chain-native operation ready for external signing and submission
#[derive(Debug, Clone)]
pub enum UnsignedOperation {
    /// Exactly one contract call
    Evm(TransactionRequest),
    /// One atomic multi-instruction transaction
    Solana(SolanaOperation),
    /// Ordered messages to broadcast together
    CosmWasm(Vec<MsgExecuteContract>),
}

impl UnsignedOperation {
    pub fn family(&self) -> ChainFamily {
        match self {
            UnsignedOperation::Evm(_) => ChainFamily::Evm,
            UnsignedOperation::Solana(_) => ChainFamily::Solana,
            UnsignedOperation::CosmWasm(_) => ChainFamily::CosmWasm,
        }
    }

    pub fn as_evm(&self) -> Option<&TransactionRequest> {
        match self {
            UnsignedOperation::Evm(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn as_solana(&self) -> Option<&SolanaOperation> {
        match self {
            UnsignedOperation::Solana(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_cosmwasm(&self) -> Option<&[MsgExecuteContract]> {
        match self {
            UnsignedOperation::CosmWasm(msgs) => Some(msgs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_truncates_to_wire_precision() {
        let intent = TransferRequest::new(1_500_000_012_345_678_901, ChainId::Solana, [1u8; 32])
            .with_relayer_fee(10_000_000_000_000_001)
            .into_intent(18)
            .unwrap();

        assert_eq!(intent.amount, 150_000_001);
        assert_eq!(intent.relayer_fee, 1_000_000);
        assert_eq!(intent.native_amount().unwrap(), 1_500_000_010_000_000_000);
        assert_eq!(intent.native_relayer_fee().unwrap(), 10_000_000_000_000_000);
    }

    #[test]
    fn test_intent_rejects_fee_above_amount() {
        let err = TransferRequest::new(100, ChainId::Ethereum, [0u8; 32])
            .with_relayer_fee(101)
            .into_intent(6)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount(_)));
    }

    #[test]
    fn test_intent_rejects_fee_with_payload() {
        let err = TransferRequest::new(100, ChainId::Ethereum, [0u8; 32])
            .with_relayer_fee(1)
            .with_payload(vec![1, 2, 3])
            .into_intent(6)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount(_)));
    }

    #[test]
    fn test_intent_rejects_dust_only_amount() {
        let err = TransferRequest::new(999, ChainId::Ethereum, [0u8; 32])
            .into_intent(18)
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount(_)));
    }

    #[test]
    fn test_wrapped_meta_native() {
        let identity = TokenIdentity::new(ChainId::Ethereum, [3u8; 32]);
        let meta = WrappedAssetMeta::native(identity);
        assert!(!meta.is_wrapped);
        assert_eq!(meta.identity(), identity);
    }

    #[test]
    fn test_token_identity_display() {
        let identity = TokenIdentity::new(ChainId::Solana, [0u8; 32]);
        assert_eq!(identity.to_string(), format!("solana:0x{}", "00".repeat(32)));
    }
}
