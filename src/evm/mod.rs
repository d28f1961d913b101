//! EVM Chain Support Module
//!
//! Builds token bridge calls for EVM-compatible chains (Ethereum, BSC,
//! Polygon, etc.)
//!
//! ## Submodules
//!
//! - `bridge` - Token bridge operation builder
//! - `client` - Read-only RPC access
//! - `contracts` - Bridge contract bindings using alloy sol! macro
//! - `tokens` - ERC20 and wrapped-token reads

pub mod bridge;
pub mod client;
pub mod contracts;
pub mod tokens;

// Re-export commonly used items
pub use bridge::EvmTokenBridge;
pub use client::{call_view, EvmReader, EvmRpcReader};
pub use contracts::{BridgeToken, TokenBridge as TokenBridgeContract, ERC20};
