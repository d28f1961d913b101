//! Attestation (VAA) decoding
//!
//! Parses the signed envelope and the token bridge payloads carried inside
//! it. Signatures are carried through untouched and never verified here; the
//! contract that accepts the attestation does that.
//!
//! ## Envelope
//!
//! ```text
//! version u8 | guardian_set_index u32 | n u8 | n * (index u8, signature 65)
//! body: timestamp u32 | nonce u32 | emitter_chain u16 | emitter_address 32
//!       | sequence u64 | consistency_level u8 | payload ...
//! ```
//!
//! All integers are big-endian.

use crate::chain::ChainId;
use crate::error::{BridgeError, Result};
use crate::hash::{double_keccak256, keccak256};

/// Only envelope version in use
pub const VAA_VERSION: u8 = 1;

const SIGNATURE_LEN: usize = 66;

// ============================================================================
// Byte Reader
// ============================================================================

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(BridgeError::malformed(format!(
                "truncated at {}: need {} bytes at offset {}, have {}",
                field,
                len,
                self.pos,
                self.data.len().saturating_sub(self.pos)
            ))),
        }
    }

    fn array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn u8(&mut self, field: &str) -> Result<u8> {
        Ok(self.array::<1>(field)?[0])
    }

    fn u16(&mut self, field: &str) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array(field)?))
    }

    fn u32(&mut self, field: &str) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array(field)?))
    }

    fn u64(&mut self, field: &str) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array(field)?))
    }

    /// uint256 that must fit in u128
    fn u256(&mut self, field: &str) -> Result<u128> {
        let raw: [u8; 32] = self.array(field)?;
        if raw[..16].iter().any(|b| *b != 0) {
            return Err(BridgeError::malformed(format!(
                "{} exceeds 128 bits",
                field
            )));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&raw[16..]);
        Ok(u128::from_be_bytes(low))
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}

// ============================================================================
// Signed Envelope
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianSignature {
    pub index: u8,
    pub signature: [u8; 65],
}

/// A decoded attestation, keeping the original bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedVaa {
    bytes: Vec<u8>,
    body_offset: usize,
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<GuardianSignature>,
    pub timestamp: u32,
    pub nonce: u32,
    /// Raw wire id; may name a chain this crate does not support
    pub emitter_chain: u16,
    pub emitter_address: [u8; 32],
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

impl SignedVaa {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);

        let version = reader.u8("version")?;
        if version != VAA_VERSION {
            return Err(BridgeError::malformed(format!(
                "unsupported version {}",
                version
            )));
        }
        let guardian_set_index = reader.u32("guardian_set_index")?;
        let num_signatures = reader.u8("signature count")? as usize;

        let mut signatures = Vec::with_capacity(num_signatures);
        for _ in 0..num_signatures {
            let raw = reader.take(SIGNATURE_LEN, "signature")?;
            let mut signature = [0u8; 65];
            signature.copy_from_slice(&raw[1..]);
            signatures.push(GuardianSignature {
                index: raw[0],
                signature,
            });
        }

        let body_offset = reader.pos;
        let timestamp = reader.u32("timestamp")?;
        let nonce = reader.u32("nonce")?;
        let emitter_chain = reader.u16("emitter_chain")?;
        let emitter_address = reader.array("emitter_address")?;
        let sequence = reader.u64("sequence")?;
        let consistency_level = reader.u8("consistency_level")?;
        let payload = reader.rest().to_vec();

        Ok(Self {
            bytes: bytes.to_vec(),
            body_offset,
            version,
            guardian_set_index,
            signatures,
            timestamp,
            nonce,
            emitter_chain,
            emitter_address,
            sequence,
            consistency_level,
            payload,
        })
    }

    /// The original signed bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The signed body (everything after the signatures)
    pub fn body(&self) -> &[u8] {
        &self.bytes[self.body_offset..]
    }

    /// keccak256(body); seeds the posted message account on Solana
    pub fn body_hash(&self) -> [u8; 32] {
        keccak256(self.body())
    }

    /// keccak256(keccak256(body)); the digest guardians sign and EVM
    /// contracts key redemption state by
    pub fn signed_hash(&self) -> [u8; 32] {
        double_keccak256(self.body())
    }

    pub fn emitter_chain_id(&self) -> Option<ChainId> {
        ChainId::try_from(self.emitter_chain).ok()
    }

    pub fn token_bridge_payload(&self) -> Result<TokenBridgePayload> {
        TokenBridgePayload::decode(&self.payload)
    }

    /// The transfer carried by this attestation, failing for asset metadata
    pub fn token_transfer(&self) -> Result<TokenTransfer> {
        match self.token_bridge_payload()? {
            TokenBridgePayload::Transfer(transfer)
            | TokenBridgePayload::TransferWithPayload(transfer) => Ok(transfer),
            TokenBridgePayload::AssetMeta(_) => Err(BridgeError::malformed(
                "expected a transfer, found asset metadata",
            )),
        }
    }
}

// ============================================================================
// Token Bridge Payloads
// ============================================================================

/// Payload discriminators
pub mod payload_id {
    pub const TRANSFER: u8 = 1;
    pub const ASSET_META: u8 = 2;
    pub const TRANSFER_WITH_PAYLOAD: u8 = 3;
}

/// Token transfer, in wire precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub amount: u128,
    pub token_address: [u8; 32],
    pub token_chain: u16,
    pub to: [u8; 32],
    pub to_chain: u16,
    /// Relayer fee; always zero for payload transfers
    pub fee: u128,
    /// Sender, present only on payload transfers
    pub from_address: Option<[u8; 32]>,
    pub payload: Option<Vec<u8>>,
}

impl TokenTransfer {
    pub fn has_payload(&self) -> bool {
        self.from_address.is_some()
    }
}

/// Token metadata registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMeta {
    pub token_address: [u8; 32],
    pub token_chain: u16,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenBridgePayload {
    Transfer(TokenTransfer),
    AssetMeta(AssetMeta),
    TransferWithPayload(TokenTransfer),
}

impl TokenBridgePayload {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        match reader.u8("payload id")? {
            payload_id::TRANSFER => {
                let amount = reader.u256("amount")?;
                let token_address = reader.array("token_address")?;
                let token_chain = reader.u16("token_chain")?;
                let to = reader.array("to")?;
                let to_chain = reader.u16("to_chain")?;
                let fee = reader.u256("fee")?;
                Ok(TokenBridgePayload::Transfer(TokenTransfer {
                    amount,
                    token_address,
                    token_chain,
                    to,
                    to_chain,
                    fee,
                    from_address: None,
                    payload: None,
                }))
            }
            payload_id::ASSET_META => {
                let token_address = reader.array("token_address")?;
                let token_chain = reader.u16("token_chain")?;
                let decimals = reader.u8("decimals")?;
                let symbol = fixed_string(&reader.array::<32>("symbol")?);
                let name = fixed_string(&reader.array::<32>("name")?);
                Ok(TokenBridgePayload::AssetMeta(AssetMeta {
                    token_address,
                    token_chain,
                    decimals,
                    symbol,
                    name,
                }))
            }
            payload_id::TRANSFER_WITH_PAYLOAD => {
                let amount = reader.u256("amount")?;
                let token_address = reader.array("token_address")?;
                let token_chain = reader.u16("token_chain")?;
                let to = reader.array("to")?;
                let to_chain = reader.u16("to_chain")?;
                let from_address = reader.array("from_address")?;
                let payload = reader.rest().to_vec();
                Ok(TokenBridgePayload::TransferWithPayload(TokenTransfer {
                    amount,
                    token_address,
                    token_chain,
                    to,
                    to_chain,
                    fee: 0,
                    from_address: Some(from_address),
                    payload: Some(payload),
                }))
            }
            other => Err(BridgeError::malformed(format!(
                "unknown token bridge payload id {}",
                other
            ))),
        }
    }
}

/// Right-padded 32-byte string field
fn fixed_string(raw: &[u8; 32]) -> String {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
