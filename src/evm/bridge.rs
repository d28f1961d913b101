//! EVM token bridge operation builder
//!
//! Every operation is exactly one contract call. The bridge contract converts
//! amounts to wire precision itself, so transfers pass native units with the
//! dust already removed.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::address_codec::{
    bytes32_to_evm_address, encode_evm_address, evm_address_to_bytes32, parse_evm_address,
};
use crate::bridge::TokenBridge;
use crate::chain::{ChainFamily, ChainId};
use crate::error::{BridgeError, Result};
use crate::evm::client::{call_view, EvmReader};
use crate::evm::contracts::{TokenBridge as TokenBridgeContract, ERC20};
use crate::evm::tokens::{get_token_decimals, get_wrapped_origin, NATIVE_DECIMALS};
use crate::types::{TokenIdentity, TransferRequest, UnsignedOperation, WrappedAssetMeta};
use crate::vaa::SignedVaa;

pub struct EvmTokenBridge {
    chain: ChainId,
    token_bridge: Address,
    reader: Arc<dyn EvmReader>,
}

impl EvmTokenBridge {
    pub fn new(chain: ChainId, token_bridge: &str, reader: Arc<dyn EvmReader>) -> Result<Self> {
        if chain.family() != ChainFamily::Evm {
            return Err(BridgeError::UnsupportedFamily {
                chain,
                family: ChainFamily::Evm,
            });
        }
        let token_bridge = parse_address(chain, token_bridge)?;
        Ok(Self {
            chain,
            token_bridge,
            reader,
        })
    }

    pub fn token_bridge(&self) -> Address {
        self.token_bridge
    }

    fn call(
        &self,
        from: Address,
        to: Address,
        calldata: Vec<u8>,
        value: U256,
    ) -> UnsignedOperation {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(Bytes::from(calldata))
            .with_value(value);
        UnsignedOperation::Evm(tx)
    }

    /// Wrapped native asset (WETH) address held by the bridge
    pub async fn wrapped_native(&self) -> Result<Address> {
        let weth = call_view(
            self.reader.as_ref(),
            self.token_bridge,
            TokenBridgeContract::WETHCall {},
        )
        .await?;
        Ok(weth._0)
    }

    /// Allowance the bridge needs before `transfer_token` can pull funds
    pub fn approve(&self, owner: &str, token: &str, amount: u128) -> Result<UnsignedOperation> {
        let owner = parse_address(self.chain, owner)?;
        let token = parse_address(self.chain, token)?;
        let calldata = ERC20::approveCall {
            spender: self.token_bridge,
            amount: U256::from(amount),
        }
        .abi_encode();
        Ok(self.call(owner, token, calldata, U256::ZERO))
    }

    async fn lookup_origin(&self, token: Address) -> eyre::Result<WrappedAssetMeta> {
        match get_wrapped_origin(self.reader.as_ref(), self.token_bridge, token).await? {
            Some((chain, address)) => {
                let origin_chain = ChainId::try_from(chain)?;
                Ok(WrappedAssetMeta::wrapped(origin_chain, address.0))
            }
            None => Ok(self.native_meta(token)),
        }
    }

    fn native_meta(&self, token: Address) -> WrappedAssetMeta {
        WrappedAssetMeta::native(TokenIdentity::new(
            self.chain,
            evm_address_to_bytes32(&token.0 .0),
        ))
    }
}

fn parse_address(chain: ChainId, addr: &str) -> Result<Address> {
    parse_evm_address(addr)
        .map(Address::from)
        .map_err(|e| BridgeError::invalid_address(chain, addr, e))
}

#[async_trait]
impl TokenBridge for EvmTokenBridge {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn attest(&self, payer: &str, token: &str, nonce: u32) -> Result<UnsignedOperation> {
        let payer = parse_address(self.chain, payer)?;
        let token = parse_address(self.chain, token)?;

        let calldata = TokenBridgeContract::attestTokenCall {
            tokenAddress: token,
            nonce,
        }
        .abi_encode();

        debug!(chain = %self.chain, token = %token, "Built EVM attest call");
        Ok(self.call(payer, self.token_bridge, calldata, U256::ZERO))
    }

    async fn transfer_native(
        &self,
        sender: &str,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let sender = parse_address(self.chain, sender)?;
        let intent = request.into_intent(NATIVE_DECIMALS)?;
        let amount = U256::from(intent.native_amount()?);
        let recipient = B256::from(intent.recipient);
        let recipient_chain = intent.recipient_chain.to_u16();

        let calldata = match intent.payload {
            Some(payload) => TokenBridgeContract::wrapAndTransferETHWithPayloadCall {
                recipientChain: recipient_chain,
                recipient,
                nonce: intent.nonce,
                payload: Bytes::from(payload),
            }
            .abi_encode(),
            None => TokenBridgeContract::wrapAndTransferETHCall {
                recipientChain: recipient_chain,
                recipient,
                arbiterFee: U256::from(intent.native_relayer_fee()?),
                nonce: intent.nonce,
            }
            .abi_encode(),
        };

        debug!(chain = %self.chain, amount = %amount, "Built EVM native transfer call");
        Ok(self.call(sender, self.token_bridge, calldata, amount))
    }

    async fn transfer_token(
        &self,
        sender: &str,
        token: &str,
        _source: Option<&str>,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let sender = parse_address(self.chain, sender)?;
        let token = parse_address(self.chain, token)?;
        let decimals = get_token_decimals(self.reader.as_ref(), token).await?;

        let intent = request.into_intent(decimals)?;
        let amount = U256::from(intent.native_amount()?);
        let recipient = B256::from(intent.recipient);
        let recipient_chain = intent.recipient_chain.to_u16();

        // The contract locks or burns depending on whether it issued `token`
        let calldata = match intent.payload {
            Some(payload) => TokenBridgeContract::transferTokensWithPayloadCall {
                token,
                amount,
                recipientChain: recipient_chain,
                recipient,
                nonce: intent.nonce,
                payload: Bytes::from(payload),
            }
            .abi_encode(),
            None => TokenBridgeContract::transferTokensCall {
                token,
                amount,
                recipientChain: recipient_chain,
                recipient,
                arbiterFee: U256::from(intent.native_relayer_fee()?),
                nonce: intent.nonce,
            }
            .abi_encode(),
        };

        debug!(chain = %self.chain, token = %token, decimals, "Built EVM token transfer call");
        Ok(self.call(sender, self.token_bridge, calldata, U256::ZERO))
    }

    async fn redeem(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let payer = parse_address(self.chain, payer)?;
        let transfer = vaa.token_transfer()?;
        let encoded_vm = Bytes::copy_from_slice(vaa.bytes());

        let calldata = if transfer.has_payload() {
            TokenBridgeContract::completeTransferWithPayloadCall { encodedVm: encoded_vm }
                .abi_encode()
        } else {
            TokenBridgeContract::completeTransferCall { encodedVm: encoded_vm }.abi_encode()
        };

        debug!(chain = %self.chain, sequence = vaa.sequence, "Built EVM redeem call");
        Ok(self.call(payer, self.token_bridge, calldata, U256::ZERO))
    }

    async fn redeem_and_unwrap(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let payer = parse_address(self.chain, payer)?;
        let transfer = vaa.token_transfer()?;

        let weth = self.wrapped_native().await?;
        let expected = TokenIdentity::new(self.chain, evm_address_to_bytes32(&weth.0 .0));
        if transfer.token_chain != self.chain.to_u16()
            || transfer.token_address != expected.address
        {
            return Err(BridgeError::AssetMismatch {
                expected: expected.to_string(),
                actual: format!(
                    "{}:0x{}",
                    transfer.token_chain,
                    hex::encode(transfer.token_address)
                ),
            });
        }

        let encoded_vm = Bytes::copy_from_slice(vaa.bytes());
        let calldata = if transfer.has_payload() {
            TokenBridgeContract::completeTransferAndUnwrapETHWithPayloadCall {
                encodedVm: encoded_vm,
            }
            .abi_encode()
        } else {
            TokenBridgeContract::completeTransferAndUnwrapETHCall { encodedVm: encoded_vm }
                .abi_encode()
        };

        debug!(chain = %self.chain, sequence = vaa.sequence, "Built EVM redeem-and-unwrap call");
        Ok(self.call(payer, self.token_bridge, calldata, U256::ZERO))
    }

    async fn is_redeemed(&self, vaa: &SignedVaa) -> bool {
        let call = TokenBridgeContract::isTransferCompletedCall {
            hash: B256::from(vaa.signed_hash()),
        };
        match call_view(self.reader.as_ref(), self.token_bridge, call).await {
            Ok(result) => result._0,
            Err(e) => {
                warn!(
                    chain = %self.chain,
                    error = %e,
                    "Completion check failed, assuming not redeemed"
                );
                false
            }
        }
    }

    async fn foreign_asset(&self, origin: &TokenIdentity) -> Option<String> {
        if origin.chain == self.chain {
            return bytes32_to_evm_address(&origin.address)
                .ok()
                .map(|raw| encode_evm_address(&raw));
        }

        let call = TokenBridgeContract::wrappedAssetCall {
            tokenChainId: origin.chain.to_u16(),
            tokenAddress: B256::from(origin.address),
        };
        match call_view(self.reader.as_ref(), self.token_bridge, call).await {
            Ok(result) if result._0 != Address::ZERO => Some(encode_evm_address(&result._0 .0 .0)),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    chain = %self.chain,
                    origin = %origin,
                    error = %e,
                    "Foreign asset lookup failed"
                );
                None
            }
        }
    }

    async fn original_asset(&self, token: &str) -> Result<WrappedAssetMeta> {
        let token = parse_address(self.chain, token)?;
        match self.lookup_origin(token).await {
            Ok(meta) => Ok(meta),
            Err(e) => {
                warn!(
                    chain = %self.chain,
                    token = %token,
                    error = %e,
                    "Original asset lookup failed"
                );
                Ok(self.native_meta(token))
            }
        }
    }
}
