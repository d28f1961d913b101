//! CosmWasm token bridge operation builder
//!
//! Operations are ordered `MsgExecuteContract` lists meant to be broadcast in
//! one transaction:
//!
//! | Operation             | Messages                                              |
//! |-----------------------|-------------------------------------------------------|
//! | attest                | `create_asset_meta`                                   |
//! | transfer, bank denom  | `deposit_tokens` (with funds), `initiate_transfer*`   |
//! | transfer, CW20        | `increase_allowance` on the token, `initiate_transfer*` |
//! | redeem, unwrap        | `submit_vaa`                                          |

use async_trait::async_trait;
use cosmrs::{cosmwasm::MsgExecuteContract, AccountId, Coin};
use cosmwasm_std::{Binary, Uint128};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::address_codec::{decode_bech32_with_prefix, left_pad32};
use crate::bridge::TokenBridge;
use crate::chain::{ChainFamily, ChainId};
use crate::cosmwasm::client::WasmQuerier;
use crate::cosmwasm::contracts::{
    Asset, AssetInfo, ExecuteMsg, IsVaaRedeemedResponse, QueryMsg, WrappedAssetInfoResponse,
    WrappedQueryMsg, WrappedRegistryResponse,
};
use crate::cosmwasm::tokens::{build_increase_allowance_msg, query_token_info};
use crate::error::{BridgeError, Result};
use crate::identity::{derive_token_identity, terra_classic_address};
use crate::types::{TokenIdentity, TransferRequest, UnsignedOperation, WrappedAssetMeta};
use crate::vaa::SignedVaa;

pub struct CosmWasmTokenBridge {
    chain: ChainId,
    token_bridge: String,
    querier: Arc<dyn WasmQuerier>,
}

impl CosmWasmTokenBridge {
    pub fn new(chain: ChainId, token_bridge: &str, querier: Arc<dyn WasmQuerier>) -> Result<Self> {
        if chain.family() != ChainFamily::CosmWasm {
            return Err(BridgeError::UnsupportedFamily {
                chain,
                family: ChainFamily::CosmWasm,
            });
        }
        let bridge = Self {
            chain,
            token_bridge: token_bridge.to_string(),
            querier,
        };
        bridge.validate_contract(token_bridge)?;
        Ok(bridge)
    }

    pub fn token_bridge(&self) -> &str {
        &self.token_bridge
    }

    fn validate_contract(&self, addr: &str) -> Result<()> {
        let prefix = self.chain.bech32_prefix().unwrap_or_default();
        decode_bech32_with_prefix(addr, prefix)
            .map(|_| ())
            .map_err(|e| BridgeError::invalid_address(self.chain, addr, e))
    }

    fn account(&self, addr: &str) -> Result<AccountId> {
        self.validate_contract(addr)?;
        addr.parse::<AccountId>()
            .map_err(|e| BridgeError::invalid_address(self.chain, addr, e))
    }

    fn execute<M: Serialize>(
        &self,
        sender: &AccountId,
        contract: &str,
        msg: &M,
        funds: Vec<Coin>,
    ) -> Result<MsgExecuteContract> {
        let msg = serde_json::to_vec(msg).map_err(|e| BridgeError::Encoding(e.to_string()))?;
        Ok(MsgExecuteContract {
            sender: sender.clone(),
            contract: self.account(contract)?,
            msg,
            funds,
        })
    }

    fn asset_info(&self, token: &str) -> Result<AssetInfo> {
        if self.chain.is_native_denom(token) {
            return Ok(AssetInfo::NativeToken {
                denom: token.to_string(),
            });
        }
        self.validate_contract(token)?;
        Ok(AssetInfo::Token {
            contract_addr: token.to_string(),
        })
    }

    async fn decimals(&self, info: &AssetInfo) -> Result<u8> {
        match info {
            AssetInfo::NativeToken { denom } => {
                self.chain.native_denom_decimals(denom).ok_or_else(|| {
                    BridgeError::invalid_address(self.chain, denom.as_str(), "unknown denomination")
                })
            }
            AssetInfo::Token { contract_addr } => {
                Ok(query_token_info(self.querier.as_ref(), contract_addr).await?.decimals)
            }
        }
    }

    async fn query<Q: Serialize + Sync, R: serde::de::DeserializeOwned>(
        &self,
        contract: &str,
        query: &Q,
    ) -> eyre::Result<R> {
        let msg = serde_json::to_value(query)?;
        let data = self.querier.query_smart(contract, &msg).await?;
        Ok(serde_json::from_value(data)?)
    }

    fn native_identity(&self) -> Result<TokenIdentity> {
        let denom = self.chain.wrapped_native_denom().ok_or(BridgeError::UnsupportedFamily {
            chain: self.chain,
            family: ChainFamily::CosmWasm,
        })?;
        derive_token_identity(self.chain, denom)
    }

    async fn lookup_origin(&self, token: &str) -> eyre::Result<WrappedAssetMeta> {
        let info: WrappedAssetInfoResponse =
            self.query(token, &WrappedQueryMsg::WrappedAssetInfo {}).await?;
        let origin_chain = ChainId::try_from(info.asset_chain)?;
        let origin_address = left_pad32(info.asset_address.as_slice())?;
        Ok(WrappedAssetMeta::wrapped(origin_chain, origin_address))
    }

    fn submit_vaa(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let sender = self.account(payer)?;
        let msg = ExecuteMsg::SubmitVaa {
            data: Binary::from(vaa.bytes()),
        };
        let execute = self.execute(&sender, &self.token_bridge, &msg, Vec::new())?;
        Ok(UnsignedOperation::CosmWasm(vec![execute]))
    }
}

#[async_trait]
impl TokenBridge for CosmWasmTokenBridge {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn attest(&self, payer: &str, token: &str, nonce: u32) -> Result<UnsignedOperation> {
        let sender = self.account(payer)?;
        let msg = ExecuteMsg::CreateAssetMeta {
            asset_info: self.asset_info(token)?,
            nonce,
        };
        let execute = self.execute(&sender, &self.token_bridge, &msg, Vec::new())?;

        debug!(chain = %self.chain, token = %token, "Built CosmWasm attest message");
        Ok(UnsignedOperation::CosmWasm(vec![execute]))
    }

    /// Sends the chain's designated native denomination
    async fn transfer_native(
        &self,
        sender: &str,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let denom = self.chain.wrapped_native_denom().ok_or(BridgeError::UnsupportedFamily {
            chain: self.chain,
            family: ChainFamily::CosmWasm,
        })?;
        self.transfer_token(sender, denom, None, request).await
    }

    async fn transfer_token(
        &self,
        sender: &str,
        token: &str,
        _source: Option<&str>,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let sender = self.account(sender)?;
        let info = self.asset_info(token)?;
        let decimals = self.decimals(&info).await?;

        let intent = request.into_intent(decimals)?;
        let amount = intent.native_amount()?;
        let fee = Uint128::new(intent.native_relayer_fee()?);
        let asset = Asset {
            info: info.clone(),
            amount: Uint128::new(amount),
        };
        let recipient = Binary::from(intent.recipient.to_vec());
        let recipient_chain = intent.recipient_chain.to_u16();

        let transfer = match intent.payload {
            Some(payload) => ExecuteMsg::InitiateTransferWithPayload {
                asset,
                recipient_chain,
                recipient,
                fee,
                payload: Binary::from(payload),
                nonce: intent.nonce,
            },
            None => ExecuteMsg::InitiateTransfer {
                asset,
                recipient_chain,
                recipient,
                fee,
                nonce: intent.nonce,
            },
        };

        let funding = match &info {
            AssetInfo::NativeToken { denom } => {
                let coin = Coin::new(amount, denom)
                    .map_err(|e| BridgeError::Encoding(format!("invalid coin: {}", e)))?;
                self.execute(
                    &sender,
                    &self.token_bridge,
                    &ExecuteMsg::DepositTokens {},
                    vec![coin],
                )?
            }
            AssetInfo::Token { contract_addr } => self.execute(
                &sender,
                contract_addr,
                &build_increase_allowance_msg(&self.token_bridge, amount),
                Vec::new(),
            )?,
        };
        let initiate = self.execute(&sender, &self.token_bridge, &transfer, Vec::new())?;

        debug!(
            chain = %self.chain,
            token = %token,
            amount,
            native = info.is_native(),
            "Built CosmWasm transfer messages"
        );
        Ok(UnsignedOperation::CosmWasm(vec![funding, initiate]))
    }

    async fn redeem(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        vaa.token_transfer()?;
        debug!(chain = %self.chain, sequence = vaa.sequence, "Building CosmWasm redeem message");
        self.submit_vaa(payer, vaa)
    }

    /// The contract pays out bank denominations directly, so unwrapping is a
    /// plain redeem once the asset is confirmed
    async fn redeem_and_unwrap(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let transfer = vaa.token_transfer()?;
        let expected = self.native_identity()?;
        if transfer.token_chain != expected.chain.to_u16()
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
        self.submit_vaa(payer, vaa)
    }

    async fn is_redeemed(&self, vaa: &SignedVaa) -> bool {
        let query = QueryMsg::IsVaaRedeemed {
            vaa: Binary::from(vaa.bytes()),
        };
        match self
            .query::<_, IsVaaRedeemedResponse>(&self.token_bridge, &query)
            .await
        {
            Ok(response) => response.is_redeemed,
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

    /// Hashed identities of local tokens cannot be inverted, so only foreign
    /// origins and Terra classic local tokens resolve
    async fn foreign_asset(&self, origin: &TokenIdentity) -> Option<String> {
        if origin.chain == self.chain {
            return match self.chain {
                ChainId::Terra => terra_classic_address(&origin.address),
                _ => None,
            };
        }
        let query = QueryMsg::WrappedRegistry {
            chain: origin.chain.to_u16(),
            address: Binary::from(origin.address.to_vec()),
        };
        match self
            .query::<_, WrappedRegistryResponse>(&self.token_bridge, &query)
            .await
        {
            Ok(response) if !response.address.is_empty() => Some(response.address),
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
        let identity = derive_token_identity(self.chain, token)?;
        if self.chain.is_native_denom(token) {
            return Ok(WrappedAssetMeta::native(identity));
        }
        match self.lookup_origin(token).await {
            Ok(meta) => Ok(meta),
            Err(e) => {
                debug!(
                    chain = %self.chain,
                    token = %token,
                    error = %e,
                    "No wrapped asset info, treating as native"
                );
                Ok(WrappedAssetMeta::native(identity))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const BRIDGE: &str = "inj1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc54tm65y";
    const SENDER: &str = "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v";

    struct FailingQuerier;

    #[async_trait]
    impl WasmQuerier for FailingQuerier {
        async fn query_smart(&self, _contract: &str, _msg: &Value) -> eyre::Result<Value> {
            Err(eyre::eyre!("lcd unavailable"))
        }
    }

    #[test]
    fn test_rejects_wrong_family_and_prefix() {
        assert!(matches!(
            CosmWasmTokenBridge::new(ChainId::Ethereum, BRIDGE, Arc::new(FailingQuerier)),
            Err(BridgeError::UnsupportedFamily { .. })
        ));
        assert!(matches!(
            CosmWasmTokenBridge::new(ChainId::Terra2, BRIDGE, Arc::new(FailingQuerier)),
            Err(BridgeError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_attest_native_denom() {
        let bridge = CosmWasmTokenBridge::new(ChainId::Injective, BRIDGE, Arc::new(FailingQuerier))
            .unwrap();
        let op = bridge.attest(BRIDGE, "inj", 3).await.unwrap();
        let msgs = op.as_cosmwasm().unwrap();
        assert_eq!(msgs.len(), 1);
        let body: Value = serde_json::from_slice(&msgs[0].msg).unwrap();
        assert_eq!(
            body,
            json!({ "create_asset_meta": {
                "asset_info": { "native_token": { "denom": "inj" } },
                "nonce": 3
            }})
        );
    }

    #[tokio::test]
    async fn test_native_transfer_deposits_first() {
        let terra_bridge = "terra1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5exk7yu";
        let bridge =
            CosmWasmTokenBridge::new(ChainId::Terra2, terra_bridge, Arc::new(FailingQuerier))
                .unwrap();
        let request = TransferRequest::new(1_234_567, ChainId::Ethereum, [9u8; 32]);
        let op = bridge.transfer_native(SENDER, request).await.unwrap();
        let msgs = op.as_cosmwasm().unwrap();
        assert_eq!(msgs.len(), 2);

        let deposit: Value = serde_json::from_slice(&msgs[0].msg).unwrap();
        assert_eq!(deposit, json!({ "deposit_tokens": {} }));
        assert_eq!(msgs[0].funds.len(), 1);
        assert_eq!(msgs[0].funds[0].amount, 1_234_567);

        let initiate: Value = serde_json::from_slice(&msgs[1].msg).unwrap();
        assert_eq!(initiate["initiate_transfer"]["asset"]["amount"], "1234567");
        assert_eq!(initiate["initiate_transfer"]["recipient_chain"], 2);
    }

    #[tokio::test]
    async fn test_cw20_transfer_needs_decimals() {
        let bridge = CosmWasmTokenBridge::new(ChainId::Injective, BRIDGE, Arc::new(FailingQuerier))
            .unwrap();
        let request = TransferRequest::new(100, ChainId::Ethereum, [9u8; 32]);
        let err = bridge
            .transfer_token(BRIDGE, BRIDGE, None, request)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Query(_)));
    }

    #[tokio::test]
    async fn test_original_asset_native_denom_short_circuits() {
        let bridge = CosmWasmTokenBridge::new(ChainId::Injective, BRIDGE, Arc::new(FailingQuerier))
            .unwrap();
        let meta = bridge.original_asset("inj").await.unwrap();
        assert!(!meta.is_wrapped);
        assert_eq!(meta.identity(), derive_token_identity(ChainId::Injective, "inj").unwrap());
        assert!(!bridge.is_wrapped_asset(BRIDGE).await);
    }
}
