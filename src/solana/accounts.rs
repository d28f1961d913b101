//! Program-derived addresses of the token bridge and core bridge programs
//!
//! | account          | program      | seeds                                              |
//! |------------------+--------------+----------------------------------------------------|
//! | config           | token bridge | `["config"]`                                       |
//! | custody          | token bridge | `[mint]`                                           |
//! | authority_signer | token bridge | `["authority_signer"]`                             |
//! | custody_signer   | token bridge | `["custody_signer"]`                               |
//! | mint_signer      | token bridge | `["mint_signer"]`                                  |
//! | emitter          | token bridge | `["emitter"]`                                      |
//! | wrapped mint     | token bridge | `["wrapped", chain BE, address, token_id?]`        |
//! | wrapped meta     | token bridge | `["meta", mint]`                                   |
//! | endpoint         | token bridge | `[emitter_chain BE, emitter_address]`              |
//! | claim            | token bridge | `[emitter_address, emitter_chain BE, sequence BE]` |
//! | bridge config    | core bridge  | `["Bridge"]`                                       |
//! | sequence         | core bridge  | `["Sequence", emitter]`                            |
//! | fee_collector    | core bridge  | `["fee_collector"]`                                |
//! | posted vaa       | core bridge  | `["PostedVAA", keccak256(body)]`                   |

use solana_sdk::pubkey::Pubkey;

use crate::vaa::SignedVaa;

/// Metaplex token metadata program
pub const SPL_TOKEN_METADATA_PROGRAM: Pubkey =
    solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Associated token account program
pub const ASSOCIATED_TOKEN_PROGRAM: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

fn pda(seeds: &[&[u8]], program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(seeds, program).0
}

// ============================================================================
// Token Bridge
// ============================================================================

pub fn config(token_bridge: &Pubkey) -> Pubkey {
    pda(&[b"config"], token_bridge)
}

pub fn custody(token_bridge: &Pubkey, mint: &Pubkey) -> Pubkey {
    pda(&[mint.as_ref()], token_bridge)
}

pub fn authority_signer(token_bridge: &Pubkey) -> Pubkey {
    pda(&[b"authority_signer"], token_bridge)
}

pub fn custody_signer(token_bridge: &Pubkey) -> Pubkey {
    pda(&[b"custody_signer"], token_bridge)
}

pub fn mint_signer(token_bridge: &Pubkey) -> Pubkey {
    pda(&[b"mint_signer"], token_bridge)
}

pub fn emitter(token_bridge: &Pubkey) -> Pubkey {
    pda(&[b"emitter"], token_bridge)
}

pub fn wrapped_mint(
    token_bridge: &Pubkey,
    token_chain: u16,
    token_address: &[u8; 32],
    token_id: Option<&[u8; 32]>,
) -> Pubkey {
    let chain = token_chain.to_be_bytes();
    match token_id {
        Some(id) => pda(&[b"wrapped", &chain, token_address, id], token_bridge),
        None => pda(&[b"wrapped", &chain, token_address], token_bridge),
    }
}

pub fn wrapped_meta(token_bridge: &Pubkey, mint: &Pubkey) -> Pubkey {
    pda(&[b"meta", mint.as_ref()], token_bridge)
}

pub fn endpoint(token_bridge: &Pubkey, emitter_chain: u16, emitter_address: &[u8; 32]) -> Pubkey {
    pda(&[&emitter_chain.to_be_bytes(), emitter_address], token_bridge)
}

/// Account whose existence marks an attestation as redeemed
pub fn claim(
    token_bridge: &Pubkey,
    emitter_address: &[u8; 32],
    emitter_chain: u16,
    sequence: u64,
) -> Pubkey {
    pda(
        &[
            emitter_address,
            &emitter_chain.to_be_bytes(),
            &sequence.to_be_bytes(),
        ],
        token_bridge,
    )
}

pub fn claim_for_vaa(token_bridge: &Pubkey, vaa: &SignedVaa) -> Pubkey {
    claim(
        token_bridge,
        &vaa.emitter_address,
        vaa.emitter_chain,
        vaa.sequence,
    )
}

/// Sender authority used when a program, not a wallet, sends a payload transfer
pub fn sender(cpi_program: &Pubkey) -> Pubkey {
    pda(&[b"sender"], cpi_program)
}

// ============================================================================
// Core Bridge
// ============================================================================

pub fn bridge_config(core_bridge: &Pubkey) -> Pubkey {
    pda(&[b"Bridge"], core_bridge)
}

pub fn sequence(core_bridge: &Pubkey, emitter: &Pubkey) -> Pubkey {
    pda(&[b"Sequence", emitter.as_ref()], core_bridge)
}

pub fn fee_collector(core_bridge: &Pubkey) -> Pubkey {
    pda(&[b"fee_collector"], core_bridge)
}

pub fn posted_vaa(core_bridge: &Pubkey, vaa: &SignedVaa) -> Pubkey {
    pda(&[b"PostedVAA", &vaa.body_hash()], core_bridge)
}

// ============================================================================
// SPL
// ============================================================================

pub fn spl_metadata(mint: &Pubkey) -> Pubkey {
    pda(
        &[
            b"metadata",
            SPL_TOKEN_METADATA_PROGRAM.as_ref(),
            mint.as_ref(),
        ],
        &SPL_TOKEN_METADATA_PROGRAM,
    )
}

pub fn associated_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    pda(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM,
    )
}
