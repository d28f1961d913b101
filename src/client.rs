//! Bridge client façade
//!
//! Holds one builder per chain, grouped by family, and routes every call to
//! the builder of the target chain. Nothing is retried, cached or signed.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::bridge::TokenBridge;
use crate::chain::{ChainFamily, ChainId};
use crate::config::BridgeConfig;
use crate::cosmwasm::{CosmWasmTokenBridge, LcdClient};
use crate::error::{BridgeError, Result};
use crate::evm::{EvmRpcReader, EvmTokenBridge};
use crate::solana::{RandomKeypairs, SolanaRpcClient, SolanaTokenBridge};
use crate::types::{TokenIdentity, TransferRequest, UnsignedOperation, WrappedAssetMeta};
use crate::vaa::SignedVaa;

type Slot = BTreeMap<ChainId, Arc<dyn TokenBridge>>;

#[derive(Default, Clone)]
pub struct BridgeClient {
    evm: Slot,
    solana: Slot,
    cosmwasm: Slot,
}

impl BridgeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build live connections for every configured chain
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let mut client = Self::new();
        for chain in config.chains() {
            let builder: Arc<dyn TokenBridge> = match chain.chain.family() {
                ChainFamily::Evm => {
                    let reader = EvmRpcReader::new(&chain.rpc_url)?;
                    Arc::new(EvmTokenBridge::new(
                        chain.chain,
                        &chain.token_bridge,
                        Arc::new(reader),
                    )?)
                }
                ChainFamily::Solana => {
                    let core_bridge = chain.core_bridge.as_deref().ok_or_else(|| {
                        BridgeError::invalid_address(
                            chain.chain,
                            "",
                            "core bridge program not configured",
                        )
                    })?;
                    Arc::new(SolanaTokenBridge::new(
                        &chain.token_bridge,
                        core_bridge,
                        Arc::new(SolanaRpcClient::new(&chain.rpc_url)),
                        Arc::new(RandomKeypairs),
                    )?)
                }
                ChainFamily::CosmWasm => {
                    let querier = match chain.request_timeout {
                        Some(timeout) => LcdClient::with_timeout(&chain.rpc_url, timeout)?,
                        None => LcdClient::new(&chain.rpc_url)?,
                    };
                    Arc::new(CosmWasmTokenBridge::new(
                        chain.chain,
                        &chain.token_bridge,
                        Arc::new(querier),
                    )?)
                }
            };
            client.register(builder);
        }

        info!(chains = config.chains().len(), "Bridge client ready");
        Ok(client)
    }

    fn slot(&self, family: ChainFamily) -> &Slot {
        match family {
            ChainFamily::Evm => &self.evm,
            ChainFamily::Solana => &self.solana,
            ChainFamily::CosmWasm => &self.cosmwasm,
        }
    }

    /// Register `builder` for its chain, returning the builder it replaces
    pub fn register(&mut self, builder: Arc<dyn TokenBridge>) -> Option<Arc<dyn TokenBridge>> {
        let chain = builder.chain();
        let slot = match chain.family() {
            ChainFamily::Evm => &mut self.evm,
            ChainFamily::Solana => &mut self.solana,
            ChainFamily::CosmWasm => &mut self.cosmwasm,
        };
        slot.insert(chain, builder)
    }

    pub fn with_builder(mut self, builder: Arc<dyn TokenBridge>) -> Self {
        self.register(builder);
        self
    }

    /// Builder registered for `chain`
    pub fn builder(&self, chain: ChainId) -> Result<&dyn TokenBridge> {
        let family = chain.family();
        self.slot(family)
            .get(&chain)
            .map(|b| b.as_ref())
            .ok_or(BridgeError::UnsupportedFamily { chain, family })
    }

    pub fn chains(&self) -> Vec<ChainId> {
        ChainFamily::ALL
            .into_iter()
            .flat_map(|family| self.slot(family).keys().copied())
            .collect()
    }

    // ========================================================================
    // Pure Operations
    // ========================================================================

    pub fn resolve_chain(input: &str) -> Result<ChainId> {
        crate::chain::resolve_chain(input)
    }

    pub fn derive_token_identity(chain: ChainId, native_address: &str) -> Result<TokenIdentity> {
        crate::identity::derive_token_identity(chain, native_address)
    }

    pub fn derive_wrapped_address(
        token_bridge: &str,
        origin: &TokenIdentity,
        token_id: Option<&[u8; 32]>,
    ) -> Result<String> {
        crate::identity::derive_wrapped_address(
            token_bridge,
            origin.chain,
            &origin.address,
            token_id,
        )
        .map(|mint| mint.to_string())
    }

    pub fn decode_vaa(bytes: &[u8]) -> Result<SignedVaa> {
        SignedVaa::decode(bytes)
    }

    // ========================================================================
    // Dispatched Operations
    // ========================================================================

    pub async fn attest(
        &self,
        chain: ChainId,
        payer: &str,
        token: &str,
        nonce: u32,
    ) -> Result<UnsignedOperation> {
        self.builder(chain)?.attest(payer, token, nonce).await
    }

    pub async fn transfer_native(
        &self,
        chain: ChainId,
        sender: &str,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        self.builder(chain)?.transfer_native(sender, request).await
    }

    pub async fn transfer_token(
        &self,
        chain: ChainId,
        sender: &str,
        token: &str,
        source: Option<&str>,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        self.builder(chain)?
            .transfer_token(sender, token, source, request)
            .await
    }

    pub async fn redeem(
        &self,
        chain: ChainId,
        payer: &str,
        vaa: &SignedVaa,
    ) -> Result<UnsignedOperation> {
        self.builder(chain)?.redeem(payer, vaa).await
    }

    pub async fn redeem_and_unwrap(
        &self,
        chain: ChainId,
        payer: &str,
        vaa: &SignedVaa,
    ) -> Result<UnsignedOperation> {
        self.builder(chain)?.redeem_and_unwrap(payer, vaa).await
    }

    /// Redemption state on `chain`; fails only when no builder is registered
    pub async fn is_redeemed(&self, chain: ChainId, vaa: &SignedVaa) -> Result<bool> {
        Ok(self.builder(chain)?.is_redeemed(vaa).await)
    }

    pub async fn foreign_asset(
        &self,
        chain: ChainId,
        origin: &TokenIdentity,
    ) -> Result<Option<String>> {
        Ok(self.builder(chain)?.foreign_asset(origin).await)
    }

    pub async fn original_asset(&self, chain: ChainId, token: &str) -> Result<WrappedAssetMeta> {
        self.builder(chain)?.original_asset(token).await
    }

    pub async fn is_wrapped_asset(&self, chain: ChainId, token: &str) -> Result<bool> {
        Ok(self.builder(chain)?.is_wrapped_asset(token).await)
    }
}
