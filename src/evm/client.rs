//! EVM RPC access
//!
//! Builders only ever issue read-only `eth_call`s. [`EvmReader`] is that one
//! capability; [`EvmRpcReader`] implements it over an HTTP provider.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result};
use tracing::info;

/// Read-only contract calls
#[async_trait]
pub trait EvmReader: Send + Sync {
    /// Execute `eth_call` against `to` and return the raw result
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;
}

/// Call a view function and decode its return values
pub async fn call_view<C: SolCall + Send>(
    reader: &dyn EvmReader,
    to: Address,
    call: C,
) -> Result<C::Return> {
    let output = reader.call(to, Bytes::from(call.abi_encode())).await?;
    C::abi_decode_returns(&output, true)
        .map_err(|e| eyre!("Failed to decode {} result: {}", C::SIGNATURE, e))
}

/// Read-only EVM RPC client
pub struct EvmRpcReader {
    /// The alloy provider
    provider: RootProvider<Http<Client>>,
}

impl EvmRpcReader {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().on_http(
            rpc_url
                .parse()
                .map_err(|e| eyre!("Invalid RPC URL: {}", e))?,
        );

        info!(rpc_url = %rpc_url, "Created read-only EVM client");

        Ok(Self { provider })
    }
}

#[async_trait]
impl EvmReader for EvmRpcReader {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        self.provider
            .call(&tx)
            .await
            .map_err(|e| eyre!("eth_call to {} failed: {}", to, e))
    }
}
