//! Solana Chain Support Module
//!
//! Builds token bridge transactions against the Solana token bridge and core
//! bridge programs.
//!
//! ## Submodules
//!
//! - `accounts` - Program-derived addresses
//! - `bridge` - Token bridge operation builder
//! - `client` - RPC access
//! - `instructions` - Token bridge instruction encoding
//! - `keys` - Ephemeral keypair sources
//! - `state` - Program account layouts

pub mod accounts;
pub mod bridge;
pub mod client;
pub mod instructions;
pub mod keys;
pub mod state;

pub use bridge::SolanaTokenBridge;
pub use client::{SolanaRpc, SolanaRpcClient};
pub use instructions::{BridgePrograms, TokenBridgeInstruction};
pub use keys::{KeypairSource, RandomKeypairs, SeededKeypairs};
