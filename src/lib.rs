//! Tokenbridge-RS: Cross-Chain Token Bridge Client
//!
//! Builds unsigned token bridge operations for EVM, Solana and CosmWasm
//! chains and answers read-only questions about bridge state:
//!
//! - **Chains** - Wire ids, names and execution families
//! - **Identity** - Canonical 32-byte token identities and Solana wrapped mints
//! - **Attestations** - Signed VAA envelope and token bridge payload decoding
//! - **Builders** - Attest, transfer, redeem and redeem-and-unwrap per family
//! - **Predicates** - Redemption state, foreign and original asset lookups
//! - **Client** - One façade dispatching to the builder of each chain
//!
//! Signing and submission are left to the caller.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! tokenbridge-rs = { path = "../tokenbridge-rs" }
//! ```

// Core modules
pub mod address_codec;
pub mod amount;
pub mod chain;
pub mod error;
pub mod hash;
pub mod identity;
pub mod types;
pub mod vaa;

// Builders and dispatch
pub mod bridge;
pub mod client;
pub mod config;

// Chain families
pub mod cosmwasm;
pub mod evm;
pub mod solana;

// Re-export commonly used items at the crate root
pub use amount::{denormalize_amount, normalize_amount, truncate_amount, MAX_WIRE_DECIMALS};
pub use bridge::TokenBridge;
pub use chain::{resolve_chain, ChainFamily, ChainId};
pub use client::BridgeClient;
pub use config::{load_from_env, BridgeConfig, ChainConfig};
pub use error::{BridgeError, Result};
pub use identity::{derive_token_identity, derive_wrapped_address};
pub use types::{
    SolanaOperation, TokenIdentity, TransferIntent, TransferRequest, UnsignedOperation,
    WrappedAssetMeta,
};
pub use vaa::{AssetMeta, SignedVaa, TokenBridgePayload, TokenTransfer};
