//! Token identity derivation
//!
//! Maps a token's native address on its origin chain to the 32-byte identity
//! the protocol uses everywhere. Pure, no I/O.
//!
//! ## Layout per family
//!
//! ```text
//! EVM       | 12 zero bytes | 20-byte address                          |
//! Solana    | 32-byte mint public key                                   |
//! CosmWasm  | 17 zero bytes | tag | keccak256(utf8 address)[0..14]      |
//! Terra     | 12 zero bytes | 20-byte canonical contract address         |
//!           | 01 | 11 zero bytes | denom left-padded to 20 bytes         |
//! ```
//!
//! The CosmWasm tag is `01` for native denominations and `00` for contract
//! tokens. That derivation is one-way and collisions are not checked.
//!
//! Terra classic predates the hashed layout: its bridge stores contract tokens
//! as padded canonical addresses and bank denominations with a leading `01`,
//! so those identities can be inverted.

use solana_sdk::pubkey::Pubkey;

use crate::address_codec::{
    decode_bech32_with_prefix, encode_bech32_address, evm_address_to_bytes32, left_pad32,
    parse_evm_address, parse_solana_address,
};
use crate::chain::{ChainFamily, ChainId};
use crate::error::{BridgeError, Result};
use crate::hash::keccak256;
use crate::solana::accounts;
use crate::types::TokenIdentity;

/// Tag byte for a CosmWasm native denomination
pub const COSMWASM_NATIVE_TAG: u8 = 0x01;

/// Tag byte for a CosmWasm contract token
pub const COSMWASM_CONTRACT_TAG: u8 = 0x00;

/// Number of hash bytes kept in a CosmWasm identity
pub const COSMWASM_HASH_LEN: usize = 14;

/// Width of a Terra classic canonical address and of a padded denomination
const TERRA_CLASSIC_ADDR_LEN: usize = 20;

/// Derive the canonical identity of a token native to `chain`
pub fn derive_token_identity(chain: ChainId, native_address: &str) -> Result<TokenIdentity> {
    let address = match chain.family() {
        ChainFamily::Evm => {
            let raw = parse_evm_address(native_address)
                .map_err(|e| BridgeError::invalid_address(chain, native_address, e))?;
            evm_address_to_bytes32(&raw)
        }
        ChainFamily::Solana => parse_solana_address(native_address)
            .map_err(|e| BridgeError::invalid_address(chain, native_address, e))?,
        ChainFamily::CosmWasm => cosmwasm_token_id(chain, native_address)?,
    };
    Ok(TokenIdentity::new(chain, address))
}

/// Identity bytes of a CosmWasm denomination or contract token
pub fn cosmwasm_token_id(chain: ChainId, address: &str) -> Result<[u8; 32]> {
    if chain == ChainId::Terra {
        return terra_classic_token_id(address);
    }

    let tag = if chain.is_native_denom(address) {
        COSMWASM_NATIVE_TAG
    } else {
        let prefix = chain.bech32_prefix().ok_or_else(|| {
            BridgeError::invalid_address(chain, address, "not a CosmWasm chain")
        })?;
        decode_bech32_with_prefix(address, prefix)
            .map_err(|e| BridgeError::invalid_address(chain, address, e))?;
        COSMWASM_CONTRACT_TAG
    };

    let digest = keccak256(address.as_bytes());
    let mut result = [0u8; 32];
    let start = 32 - COSMWASM_HASH_LEN - 1;
    result[start] = tag;
    result[start + 1..].copy_from_slice(&digest[..COSMWASM_HASH_LEN]);
    Ok(result)
}

/// Identity bytes as the Terra classic bridge records them
pub fn terra_classic_token_id(address: &str) -> Result<[u8; 32]> {
    let chain = ChainId::Terra;
    if chain.is_native_denom(address) {
        if address.len() > TERRA_CLASSIC_ADDR_LEN {
            return Err(BridgeError::invalid_address(chain, address, "denom too long"));
        }
        let mut result = [0u8; 32];
        result[32 - address.len()..].copy_from_slice(address.as_bytes());
        result[0] = COSMWASM_NATIVE_TAG;
        return Ok(result);
    }

    let canonical = decode_bech32_with_prefix(address, "terra")
        .map_err(|e| BridgeError::invalid_address(chain, address, e))?;
    if canonical.len() != TERRA_CLASSIC_ADDR_LEN {
        let reason = format!(
            "expected {} byte address, got {}",
            TERRA_CLASSIC_ADDR_LEN,
            canonical.len()
        );
        return Err(BridgeError::invalid_address(chain, address, reason));
    }
    left_pad32(&canonical).map_err(|e| BridgeError::invalid_address(chain, address, e))
}

/// Recover the denomination or contract address behind a Terra classic identity
pub fn terra_classic_address(identity: &[u8; 32]) -> Option<String> {
    let (head, tail) = identity.split_at(32 - TERRA_CLASSIC_ADDR_LEN);
    match head {
        [COSMWASM_NATIVE_TAG, rest @ ..] if rest.iter().all(|b| *b == 0) => {
            let start = tail.iter().position(|b| *b != 0)?;
            let denom = std::str::from_utf8(&tail[start..]).ok()?;
            ChainId::Terra.is_native_denom(denom).then(|| denom.to_string())
        }
        _ if head.iter().all(|b| *b == 0) => encode_bech32_address(tail, "terra").ok(),
        _ => None,
    }
}

/// Lay a native account address into the 32-byte recipient slot
///
/// Unlike token identities, CosmWasm recipients use their canonical bech32
/// bytes so the destination contract can reconstruct the account.
pub fn recipient_bytes32(chain: ChainId, address: &str) -> Result<[u8; 32]> {
    match chain.family() {
        ChainFamily::Evm => parse_evm_address(address)
            .map(|raw| evm_address_to_bytes32(&raw))
            .map_err(|e| BridgeError::invalid_address(chain, address, e)),
        ChainFamily::Solana => parse_solana_address(address)
            .map_err(|e| BridgeError::invalid_address(chain, address, e)),
        ChainFamily::CosmWasm => {
            let prefix = chain.bech32_prefix().unwrap_or_default();
            decode_bech32_with_prefix(address, prefix)
                .and_then(|raw| left_pad32(&raw))
                .map_err(|e| BridgeError::invalid_address(chain, address, e))
        }
    }
}

/// Address of the Solana mint that wraps a foreign asset
///
/// `token_id` extends the seeds for non-fungible assets. The account need not
/// exist yet.
pub fn derive_wrapped_address(
    token_bridge: &str,
    origin_chain: ChainId,
    origin_address: &[u8; 32],
    token_id: Option<&[u8; 32]>,
) -> Result<Pubkey> {
    let program = parse_solana_address(token_bridge)
        .map(Pubkey::new_from_array)
        .map_err(|e| BridgeError::invalid_address(ChainId::Solana, token_bridge, e))?;
    Ok(accounts::wrapped_mint(
        &program,
        origin_chain.to_u16(),
        origin_address,
        token_id,
    ))
}
