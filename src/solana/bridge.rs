//! Solana token bridge operation builder
//!
//! Each operation is one transaction with the sender as fee payer. Ephemeral
//! message and token accounts are created, used and closed inside that
//! transaction, and their keys sign it before it is handed back.

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_token::{
    instruction as token_instruction,
    native_mint,
    solana_program::program_pack::Pack,
    state::{Account as TokenAccount, Mint},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::address_codec::parse_solana_address;
use crate::amount::denormalize_amount;
use crate::bridge::TokenBridge;
use crate::chain::ChainId;
use crate::error::{BridgeError, Result};
use crate::solana::accounts;
use crate::solana::client::SolanaRpc;
use crate::solana::instructions::{
    BridgePrograms, TransferArgs, TransferData, TransferWithPayloadData,
};
use crate::solana::keys::KeypairSource;
use crate::solana::state::{decode_account, BridgeData, Claim, WrappedMeta};
use crate::types::{
    SolanaOperation, TokenIdentity, TransferIntent, TransferRequest, UnsignedOperation,
    WrappedAssetMeta,
};
use crate::vaa::SignedVaa;

pub struct SolanaTokenBridge {
    programs: BridgePrograms,
    rpc: Arc<dyn SolanaRpc>,
    keys: Arc<dyn KeypairSource>,
}

impl SolanaTokenBridge {
    pub fn new(
        token_bridge: &str,
        core_bridge: &str,
        rpc: Arc<dyn SolanaRpc>,
        keys: Arc<dyn KeypairSource>,
    ) -> Result<Self> {
        Ok(Self {
            programs: BridgePrograms {
                token_bridge: parse_pubkey(token_bridge)?,
                core_bridge: parse_pubkey(core_bridge)?,
            },
            rpc,
            keys,
        })
    }

    pub fn programs(&self) -> &BridgePrograms {
        &self.programs
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.rpc.account_data(address).await?)
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let data = self
            .account_data(mint)
            .await?
            .ok_or_else(|| BridgeError::Query(format!("mint {} does not exist", mint)))?;
        let mint_state = Mint::unpack(&data)
            .map_err(|e| BridgeError::Query(format!("failed to decode mint {}: {}", mint, e)))?;
        Ok(mint_state.decimals)
    }

    async fn bridge_fee(&self) -> Result<u64> {
        let address = accounts::bridge_config(&self.programs.core_bridge);
        let data = self
            .account_data(&address)
            .await?
            .ok_or_else(|| {
                BridgeError::Query(format!("bridge config {} does not exist", address))
            })?;
        let bridge: BridgeData = decode_account("bridge config", &data)?;
        Ok(bridge.config.fee)
    }

    async fn rent_exempt_token_account(&self) -> Result<u64> {
        Ok(self
            .rpc
            .minimum_balance_for_rent_exemption(TokenAccount::LEN)
            .await?)
    }

    /// Origin recorded for a bridge-issued mint, `None` for any other mint
    async fn wrapped_origin(&self, mint: &Pubkey) -> Result<Option<WrappedMeta>> {
        let meta = accounts::wrapped_meta(&self.programs.token_bridge, mint);
        match self.account_data(&meta).await? {
            Some(data) => Ok(Some(decode_account("wrapped meta", &data)?)),
            None => Ok(None),
        }
    }

    fn new_keypair(&self) -> Result<Keypair> {
        self.keys.new_keypair()
    }

    /// Assemble the transaction, stamp a recent blockhash and sign with the
    /// ephemeral keys
    async fn finish(
        &self,
        payer: &Pubkey,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
    ) -> Result<UnsignedOperation> {
        let blockhash: Hash = self.rpc.latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(&instructions, Some(payer));
        transaction.message.recent_blockhash = blockhash;
        if !signers.is_empty() {
            transaction
                .try_partial_sign(signers, blockhash)
                .map_err(|e| BridgeError::Encoding(format!("partial sign failed: {}", e)))?;
        }

        debug!(
            instructions = instructions.len(),
            co_signers = signers.len(),
            "Built Solana transaction"
        );

        Ok(UnsignedOperation::Solana(SolanaOperation {
            instructions,
            transaction,
            co_signers: signers.iter().map(|k| k.pubkey()).collect(),
        }))
    }
}

fn parse_pubkey(addr: &str) -> Result<Pubkey> {
    parse_solana_address(addr)
        .map(Pubkey::new_from_array)
        .map_err(|e| BridgeError::invalid_address(ChainId::Solana, addr, e))
}

fn to_u64(value: u128, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| BridgeError::InvalidAmount(format!("{} {} does not fit in u64", what, value)))
}

fn token_error(e: impl std::fmt::Display) -> BridgeError {
    BridgeError::Encoding(format!("spl token instruction: {}", e))
}

/// Bridge instruction arguments; amounts stay in native units since the
/// program truncates on its own
fn transfer_args(intent: TransferIntent) -> Result<(u64, TransferArgs)> {
    let amount = to_u64(intent.native_amount()?, "amount")?;
    let target_chain = intent.recipient_chain.to_u16();
    let args = match intent.payload {
        Some(payload) => TransferArgs::WithPayload(TransferWithPayloadData {
            nonce: intent.nonce,
            amount,
            target_address: intent.recipient,
            target_chain,
            payload,
            cpi_program_id: None,
        }),
        None => TransferArgs::Plain(TransferData {
            nonce: intent.nonce,
            amount,
            fee: to_u64(intent.native_relayer_fee()?, "relayer fee")?,
            target_address: intent.recipient,
            target_chain,
        }),
    };
    Ok((amount, args))
}

#[async_trait]
impl TokenBridge for SolanaTokenBridge {
    fn chain(&self) -> ChainId {
        ChainId::Solana
    }

    async fn attest(&self, payer: &str, token: &str, nonce: u32) -> Result<UnsignedOperation> {
        let payer = parse_pubkey(payer)?;
        let mint = parse_pubkey(token)?;
        let fee = self.bridge_fee().await?;
        let message = self.new_keypair()?;

        let instructions = vec![
            system_instruction::transfer(
                &payer,
                &accounts::fee_collector(&self.programs.core_bridge),
                fee,
            ),
            self.programs
                .attest(&payer, &message.pubkey(), &mint, nonce)?,
        ];

        self.finish(&payer, instructions, &[&message]).await
    }

    /// Wraps lamports into a temporary token account, bridges it and closes
    /// the account again
    async fn transfer_native(
        &self,
        sender: &str,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let payer = parse_pubkey(sender)?;
        let intent = request.into_intent(native_mint::DECIMALS)?;
        let (amount, args) = transfer_args(intent)?;

        let rent = self.rent_exempt_token_account().await?;
        let ancillary = self.new_keypair()?;
        let message = self.new_keypair()?;
        let token_program = spl_token::id();
        let mint = native_mint::id();
        let authority = accounts::authority_signer(&self.programs.token_bridge);

        let instructions = vec![
            system_instruction::create_account(
                &payer,
                &ancillary.pubkey(),
                rent,
                TokenAccount::LEN as u64,
                &token_program,
            ),
            system_instruction::transfer(&payer, &ancillary.pubkey(), amount),
            token_instruction::initialize_account(
                &token_program,
                &ancillary.pubkey(),
                &mint,
                &payer,
            )
            .map_err(token_error)?,
            token_instruction::approve(
                &token_program,
                &ancillary.pubkey(),
                &authority,
                &payer,
                &[],
                amount,
            )
            .map_err(token_error)?,
            self.programs.transfer_native(
                &payer,
                &message.pubkey(),
                &ancillary.pubkey(),
                &mint,
                &args,
            )?,
            token_instruction::close_account(
                &token_program,
                &ancillary.pubkey(),
                &payer,
                &payer,
                &[],
            )
            .map_err(token_error)?,
        ];

        self.finish(&payer, instructions, &[&message, &ancillary])
            .await
    }

    async fn transfer_token(
        &self,
        sender: &str,
        token: &str,
        source: Option<&str>,
        request: TransferRequest,
    ) -> Result<UnsignedOperation> {
        let payer = parse_pubkey(sender)?;
        let mint = parse_pubkey(token)?;
        let from = match source {
            Some(source) => parse_pubkey(source)?,
            None => accounts::associated_token_account(&payer, &mint),
        };

        let decimals = self.mint_decimals(&mint).await?;
        let intent = request.into_intent(decimals)?;
        let (amount, args) = transfer_args(intent)?;
        let origin = self.wrapped_origin(&mint).await?;

        let message = self.new_keypair()?;
        let authority = accounts::authority_signer(&self.programs.token_bridge);
        let approve = token_instruction::approve(
            &spl_token::id(),
            &from,
            &authority,
            &payer,
            &[],
            amount,
        )
        .map_err(token_error)?;

        let bridge_transfer = match origin {
            Some(meta) => self.programs.transfer_wrapped(
                &payer,
                &message.pubkey(),
                &from,
                &payer,
                meta.chain,
                &meta.token_address,
                &args,
            )?,
            None => {
                self.programs
                    .transfer_native(&payer, &message.pubkey(), &from, &mint, &args)?
            }
        };

        debug!(
            mint = %mint,
            wrapped = origin.is_some(),
            decimals,
            "Building Solana token transfer"
        );
        self.finish(&payer, vec![approve, bridge_transfer], &[&message])
            .await
    }

    async fn redeem(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let payer = parse_pubkey(payer)?;
        let transfer = vaa.token_transfer()?;
        let to = Pubkey::new_from_array(transfer.to);
        let to_owner = transfer.has_payload().then_some(&payer);

        let complete = if transfer.token_chain == ChainId::Solana.to_u16() {
            let mint = Pubkey::new_from_array(transfer.token_address);
            self.programs
                .complete_native(&payer, vaa, &to, to_owner, None, &mint)?
        } else {
            self.programs.complete_wrapped(
                &payer,
                vaa,
                &to,
                to_owner,
                None,
                transfer.token_chain,
                &transfer.token_address,
            )?
        };

        self.finish(&payer, vec![complete], &[]).await
    }

    /// Redeems wrapped SOL into a temporary account and pays the lamports out
    /// to the payer
    async fn redeem_and_unwrap(&self, payer: &str, vaa: &SignedVaa) -> Result<UnsignedOperation> {
        let payer = parse_pubkey(payer)?;
        let transfer = vaa.token_transfer()?;
        let mint = native_mint::id();
        let expected = TokenIdentity::new(ChainId::Solana, mint.to_bytes());
        if transfer.token_chain != ChainId::Solana.to_u16()
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

        let decimals = self.mint_decimals(&mint).await?;
        let amount = to_u64(denormalize_amount(transfer.amount, decimals)?, "amount")?;
        let rent = self.rent_exempt_token_account().await?;
        let ancillary = self.new_keypair()?;
        let token_program = spl_token::id();
        let to = Pubkey::new_from_array(transfer.to);
        let to_owner = transfer.has_payload().then_some(&payer);

        let instructions = vec![
            self.programs
                .complete_native(&payer, vaa, &to, to_owner, None, &mint)?,
            system_instruction::create_account(
                &payer,
                &ancillary.pubkey(),
                rent,
                TokenAccount::LEN as u64,
                &token_program,
            ),
            token_instruction::initialize_account(
                &token_program,
                &ancillary.pubkey(),
                &mint,
                &payer,
            )
            .map_err(token_error)?,
            token_instruction::transfer(
                &token_program,
                &to,
                &ancillary.pubkey(),
                &payer,
                &[],
                amount,
            )
            .map_err(token_error)?,
            token_instruction::close_account(
                &token_program,
                &ancillary.pubkey(),
                &payer,
                &payer,
                &[],
            )
            .map_err(token_error)?,
        ];

        self.finish(&payer, instructions, &[&ancillary]).await
    }

    async fn is_redeemed(&self, vaa: &SignedVaa) -> bool {
        let claim = accounts::claim_for_vaa(&self.programs.token_bridge, vaa);
        match self.rpc.account_data(&claim).await {
            Ok(Some(data)) => decode_account::<Claim>("claim", &data)
                .map(|c| c.claimed)
                .unwrap_or(true),
            Ok(None) => false,
            Err(e) => {
                warn!(claim = %claim, error = %e, "Completion check failed, assuming not redeemed");
                false
            }
        }
    }

    async fn foreign_asset(&self, origin: &TokenIdentity) -> Option<String> {
        if origin.chain == ChainId::Solana {
            return Some(Pubkey::new_from_array(origin.address).to_string());
        }

        let mint = accounts::wrapped_mint(
            &self.programs.token_bridge,
            origin.chain.to_u16(),
            &origin.address,
            None,
        );
        let meta = accounts::wrapped_meta(&self.programs.token_bridge, &mint);
        match self.rpc.account_data(&meta).await {
            Ok(Some(_)) => Some(mint.to_string()),
            Ok(None) => None,
            Err(e) => {
                warn!(origin = %origin, error = %e, "Foreign asset lookup failed");
                None
            }
        }
    }

    async fn original_asset(&self, token: &str) -> Result<WrappedAssetMeta> {
        let mint = parse_pubkey(token)?;
        let native = WrappedAssetMeta::native(TokenIdentity::new(ChainId::Solana, mint.to_bytes()));

        let origin = match self.wrapped_origin(&mint).await {
            Ok(origin) => origin,
            Err(e) => {
                warn!(mint = %mint, error = %e, "Original asset lookup failed");
                return Ok(native);
            }
        };
        match origin {
            Some(meta) => match ChainId::try_from(meta.chain) {
                Ok(chain) => Ok(WrappedAssetMeta::wrapped(chain, meta.token_address)),
                Err(e) => {
                    warn!(mint = %mint, error = %e, "Wrapped mint has unknown origin chain");
                    Ok(native)
                }
            },
            None => Ok(native),
        }
    }
}
