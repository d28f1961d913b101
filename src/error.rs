//! Error types for the token bridge client
//!
//! Everything that derives, decodes or builds returns [`BridgeError`].
//! Connection adapters (RPC providers, LCD clients) speak `eyre` and are
//! converted to [`BridgeError::Query`] at the builder boundary.

use thiserror::Error;

use crate::chain::{ChainFamily, ChainId};

/// Result alias used across the public API
pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Invalid {chain} address '{address}': {reason}")]
    InvalidAddress {
        chain: ChainId,
        address: String,
        reason: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // ========================================================================
    // Attestation Errors
    // ========================================================================
    #[error("Malformed attestation: {0}")]
    MalformedAttestation(String),

    #[error("Asset mismatch: expected {expected}, got {actual}")]
    AssetMismatch { expected: String, actual: String },

    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    #[error("No {family} builder registered for chain {chain}")]
    UnsupportedFamily { chain: ChainId, family: ChainFamily },

    // ========================================================================
    // Construction Errors
    // ========================================================================
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl BridgeError {
    pub(crate) fn invalid_address(
        chain: ChainId,
        address: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        BridgeError::InvalidAddress {
            chain,
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        BridgeError::MalformedAttestation(reason.into())
    }
}

impl From<eyre::Report> for BridgeError {
    fn from(err: eyre::Report) -> Self {
        BridgeError::Query(format!("{:#}", err))
    }
}
