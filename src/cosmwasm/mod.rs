//! CosmWasm Chain Support Module
//!
//! Builds token bridge messages for CosmWasm chains (Terra, Injective, XPLA).
//!
//! ## Submodules
//!
//! - `bridge` - Token bridge operation builder
//! - `client` - Smart-query access over LCD
//! - `contracts` - Bridge message definitions
//! - `tokens` - CW20 helpers

pub mod bridge;
pub mod client;
pub mod contracts;
pub mod tokens;

pub use bridge::CosmWasmTokenBridge;
pub use client::{LcdClient, WasmQuerier};
pub use contracts::{AssetInfo, ExecuteMsg, QueryMsg};
