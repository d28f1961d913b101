//! Native Address Encoding
//!
//! Parses each family's human-readable address format into raw bytes and
//! lays raw addresses into the protocol's fixed 32-byte slot.
//!
//! ## Formats
//!
//! - EVM: `0x`-prefixed hex, 20 bytes, left-padded to 32
//! - Solana: base58, 32 bytes, used as-is
//! - CosmWasm: bech32, 20-byte wallets or 32-byte contracts, left-padded to 32

use bech32::{self, FromBase32, ToBase32, Variant};
use eyre::{eyre, Result};

// ============================================================================
// EVM
// ============================================================================

/// Parse a 0x-prefixed hex EVM address to 20 bytes
pub fn parse_evm_address(addr: &str) -> Result<[u8; 20]> {
    let hex_str = addr.strip_prefix("0x").unwrap_or(addr);

    if hex_str.len() != 40 {
        return Err(eyre!(
            "Invalid EVM address length: expected 40 hex chars, got {}",
            hex_str.len()
        ));
    }

    let bytes = hex::decode(hex_str)?;

    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes);
    Ok(result)
}

/// Encode 20 bytes to EVM hex string with 0x prefix
pub fn encode_evm_address(bytes: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Convert an EVM address to bytes32 (left-padded with zeros)
pub fn evm_address_to_bytes32(addr: &[u8; 20]) -> [u8; 32] {
    let mut result = [0u8; 32];
    result[12..32].copy_from_slice(addr);
    result
}

/// Extract the 20-byte EVM address from a bytes32 slot
///
/// Fails if the upper 12 bytes are not zero.
pub fn bytes32_to_evm_address(bytes: &[u8; 32]) -> Result<[u8; 20]> {
    if bytes[..12].iter().any(|b| *b != 0) {
        return Err(eyre!(
            "Not an EVM address: upper 12 bytes of 0x{} are non-zero",
            hex::encode(bytes)
        ));
    }
    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes[12..32]);
    Ok(result)
}

// ============================================================================
// Solana
// ============================================================================

/// Parse a base58 Solana public key to 32 bytes
pub fn parse_solana_address(addr: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(addr)
        .into_vec()
        .map_err(|e| eyre!("Invalid base58 address: {}", e))?;

    if bytes.len() != 32 {
        return Err(eyre!(
            "Invalid Solana address length: expected 32 bytes, got {}",
            bytes.len()
        ));
    }

    let mut result = [0u8; 32];
    result.copy_from_slice(&bytes);
    Ok(result)
}

// ============================================================================
// Cosmos / CosmWasm
// ============================================================================

/// Decode a bech32 address to raw bytes (variable length: 20 or 32 bytes)
///
/// Supports both 20-byte (wallet) and 32-byte (contract) addresses.
/// Returns (raw_bytes, hrp) where hrp is the human-readable prefix.
pub fn decode_bech32_address_raw(addr: &str) -> Result<(Vec<u8>, String)> {
    let (hrp, data, _variant) =
        bech32::decode(addr).map_err(|e| eyre!("Invalid bech32 address: {}", e))?;

    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| eyre!("Invalid base32 data: {}", e))?;

    if bytes.len() != 20 && bytes.len() != 32 {
        return Err(eyre!(
            "Invalid address length: expected 20 or 32 bytes, got {}",
            bytes.len()
        ));
    }

    Ok((bytes, hrp))
}

/// Decode a bech32 address and require a specific prefix
pub fn decode_bech32_with_prefix(addr: &str, expected_hrp: &str) -> Result<Vec<u8>> {
    let (bytes, hrp) = decode_bech32_address_raw(addr)?;
    if hrp != expected_hrp {
        return Err(eyre!(
            "Expected '{}' prefix, got '{}'",
            expected_hrp,
            hrp
        ));
    }
    Ok(bytes)
}

/// Encode raw bytes to a bech32 address with given prefix
pub fn encode_bech32_address(bytes: &[u8], hrp: &str) -> Result<String> {
    let encoded = bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| eyre!("Failed to encode bech32: {}", e))?;
    Ok(encoded)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Left-pad up to 32 bytes into a bytes32 slot
pub fn left_pad32(bytes: &[u8]) -> Result<[u8; 32]> {
    if bytes.len() > 32 {
        return Err(eyre!(
            "Address too long for 32-byte slot: {} bytes",
            bytes.len()
        ));
    }
    let mut result = [0u8; 32];
    result[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(result)
}
