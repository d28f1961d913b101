//! The operation set every chain family implements
//!
//! Builders return unsigned operations and never sign with the caller's key.
//! Address arguments are in the chain's native format (hex, base58 or
//! bech32). Predicates (`is_redeemed`, `foreign_asset`, `is_wrapped_asset`)
//! answer negatively when the chain cannot be queried.

use async_trait::async_trait;

use crate::chain::ChainId;
use crate::error::Result;
use crate::types::{TokenIdentity, TransferRequest, UnsignedOperation, WrappedAssetMeta};
use crate::vaa::SignedVaa;

#[async_trait]
pub trait TokenBridge: Send + Sync {
    /// Chain this builder targets
    fn chain(&self) -> ChainId;

    /// Register a native token's metadata with the bridge
    async fn attest(&self, payer: &str, token: &str, nonce: u32) -> Result<UnsignedOperation>;

    /// Lock the chain's native currency and emit a transfer
    async fn transfer_native(
        &self,
        sender: &str,
        request: TransferRequest,
    ) -> Result<UnsignedOperation>;

    /// Lock a native token or burn a wrapped one, depending on its origin
    ///
    /// `source` is the account holding the tokens where the family separates
    /// token accounts from owners; it defaults to the sender's canonical one.
    async fn transfer_token(
        &self,
        sender: &str,
        token: &str,
        source: Option<&str>,
        request: TransferRequest,
    ) -> Result<UnsignedOperation>;

    /// Submit a transfer attestation to mint or unlock on this chain
    async fn redeem(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation>;

    /// Redeem a transfer of this chain's wrapped native asset and pay out
    /// the native currency
    async fn redeem_and_unwrap(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation>;

    /// Whether the attestation was already redeemed on this chain
    ///
    /// Any failure to query reads as `false`.
    async fn is_redeemed(&self, vaa: &SignedVaa) -> bool;

    /// Local address representing `origin` on this chain, if any
    async fn foreign_asset(&self, origin: &TokenIdentity) -> Option<String>;

    /// Where a local token originally came from
    ///
    /// Fails only for a malformed address; an unqueryable token reads as
    /// native to this chain.
    async fn original_asset(&self, token: &str) -> Result<WrappedAssetMeta>;

    async fn is_wrapped_asset(&self, token: &str) -> bool {
        self.original_asset(token)
            .await
            .map(|meta| meta.is_wrapped)
            .unwrap_or(false)
    }
}
