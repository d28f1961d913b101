//! Hash computation
//!
//! Keccak-256 is the only hash the protocol uses: for token identities of
//! CosmWasm assets, and for the attestation digests that key redemption state
//! on EVM (double hash) and Solana (single hash).

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// keccak256(keccak256(data))
pub fn double_keccak256(data: &[u8]) -> [u8; 32] {
    keccak256(&keccak256(data))
}
