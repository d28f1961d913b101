//! ERC20 and bridge-token reads

use alloy::primitives::{Address, B256};
use eyre::Result;

use crate::evm::client::{call_view, EvmReader};
use crate::evm::contracts::{BridgeToken, TokenBridge, ERC20};

/// Decimals of the native asset on every EVM chain
pub const NATIVE_DECIMALS: u8 = 18;

/// Get token decimals
pub async fn get_token_decimals(reader: &dyn EvmReader, token: Address) -> Result<u8> {
    Ok(call_view(reader, token, ERC20::decimalsCall {}).await?._0)
}

/// Origin chain and address of a bridge-issued token, `None` if the bridge
/// did not issue it
pub async fn get_wrapped_origin(
    reader: &dyn EvmReader,
    token_bridge: Address,
    token: Address,
) -> Result<Option<(u16, B256)>> {
    let is_wrapped = call_view(
        reader,
        token_bridge,
        TokenBridge::isWrappedAssetCall { token },
    )
    .await?
    ._0;
    if !is_wrapped {
        return Ok(None);
    }

    let chain = call_view(reader, token, BridgeToken::chainIdCall {}).await?._0;
    let address = call_view(reader, token, BridgeToken::nativeContractCall {})
        .await?
        ._0;
    Ok(Some((chain, address)))
}
