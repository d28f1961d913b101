//! Token bridge instruction encoding
//!
//! Instruction data is a one-byte discriminator followed by the borsh
//! encoding of the instruction's arguments. Account lists follow the order
//! the on-chain program peels them in.

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::error::{BridgeError, Result};
use crate::solana::accounts;
use crate::vaa::SignedVaa;

/// Token bridge instruction discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenBridgeInstruction {
    Initialize = 0,
    AttestToken = 1,
    CompleteNative = 2,
    CompleteWrapped = 3,
    TransferWrapped = 4,
    TransferNative = 5,
    RegisterChain = 6,
    CreateWrapped = 7,
    UpgradeContract = 8,
    CompleteNativeWithPayload = 9,
    CompleteWrappedWithPayload = 10,
    TransferWrappedWithPayload = 11,
    TransferNativeWithPayload = 12,
}

// ============================================================================
// Instruction Data
// ============================================================================

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct AttestTokenData {
    pub nonce: u32,
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferData {
    pub nonce: u32,
    pub amount: u64,
    pub fee: u64,
    pub target_address: [u8; 32],
    pub target_chain: u16,
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferWithPayloadData {
    pub nonce: u32,
    pub amount: u64,
    pub target_address: [u8; 32],
    pub target_chain: u16,
    pub payload: Vec<u8>,
    pub cpi_program_id: Option<[u8; 32]>,
}

#[derive(BorshSerialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteData {}

fn encode<T: BorshSerialize>(tag: TokenBridgeInstruction, data: &T) -> Result<Vec<u8>> {
    (tag as u8, data)
        .try_to_vec()
        .map_err(|e| BridgeError::Encoding(format!("{:?} data: {}", tag, e)))
}

// ============================================================================
// Program Context
// ============================================================================

/// Program ids every token bridge instruction needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgePrograms {
    pub token_bridge: Pubkey,
    pub core_bridge: Pubkey,
}

/// Transfer flavour: plain (with relayer fee) or carrying a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferArgs {
    Plain(TransferData),
    WithPayload(TransferWithPayloadData),
}

impl TransferArgs {
    fn sender(&self, payer: &Pubkey) -> Option<Pubkey> {
        match self {
            TransferArgs::Plain(_) => None,
            TransferArgs::WithPayload(data) => Some(match data.cpi_program_id {
                Some(program) => accounts::sender(&Pubkey::new_from_array(program)),
                None => *payer,
            }),
        }
    }
}

impl BridgePrograms {
    /// Core bridge accounts shared by every message-emitting instruction
    fn message_accounts(&self, message: &Pubkey) -> Vec<AccountMeta> {
        let emitter = accounts::emitter(&self.token_bridge);
        vec![
            AccountMeta::new(accounts::bridge_config(&self.core_bridge), false),
            AccountMeta::new(*message, true),
            AccountMeta::new_readonly(emitter, false),
            AccountMeta::new(accounts::sequence(&self.core_bridge, &emitter), false),
            AccountMeta::new(accounts::fee_collector(&self.core_bridge), false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ]
    }

    fn claimable_vaa(&self, vaa: &SignedVaa) -> [AccountMeta; 3] {
        [
            AccountMeta::new_readonly(accounts::posted_vaa(&self.core_bridge, vaa), false),
            AccountMeta::new(accounts::claim_for_vaa(&self.token_bridge, vaa), false),
            AccountMeta::new_readonly(
                accounts::endpoint(&self.token_bridge, vaa.emitter_chain, &vaa.emitter_address),
                false,
            ),
        ]
    }

    // ========================================================================
    // Attest
    // ========================================================================

    pub fn attest(
        &self,
        payer: &Pubkey,
        message: &Pubkey,
        mint: &Pubkey,
        nonce: u32,
    ) -> Result<Instruction> {
        let mut metas = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(accounts::config(&self.token_bridge), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(accounts::wrapped_meta(&self.token_bridge, mint), false),
            AccountMeta::new_readonly(accounts::spl_metadata(mint), false),
        ];
        metas.extend(self.message_accounts(message));
        metas.extend([
            AccountMeta::new(sysvar::rent::id(), false),
            AccountMeta::new(system_program::id(), false),
            AccountMeta::new_readonly(self.core_bridge, false),
        ]);

        Ok(Instruction {
            program_id: self.token_bridge,
            accounts: metas,
            data: encode(TokenBridgeInstruction::AttestToken, &AttestTokenData { nonce })?,
        })
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Lock a Solana-native mint in custody
    pub fn transfer_native(
        &self,
        payer: &Pubkey,
        message: &Pubkey,
        from: &Pubkey,
        mint: &Pubkey,
        args: &TransferArgs,
    ) -> Result<Instruction> {
        let mut metas = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(accounts::config(&self.token_bridge), false),
            AccountMeta::new(*from, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new(accounts::custody(&self.token_bridge, mint), false),
            AccountMeta::new_readonly(accounts::authority_signer(&self.token_bridge), false),
            AccountMeta::new_readonly(accounts::custody_signer(&self.token_bridge), false),
        ];
        metas.extend(self.message_accounts(message));
        self.finish_transfer(
            metas,
            payer,
            args,
            TokenBridgeInstruction::TransferNative,
            TokenBridgeInstruction::TransferNativeWithPayload,
        )
    }

    /// Burn a wrapped mint
    #[allow(clippy::too_many_arguments)]
    pub fn transfer_wrapped(
        &self,
        payer: &Pubkey,
        message: &Pubkey,
        from: &Pubkey,
        from_owner: &Pubkey,
        token_chain: u16,
        token_address: &[u8; 32],
        args: &TransferArgs,
    ) -> Result<Instruction> {
        let mint = accounts::wrapped_mint(&self.token_bridge, token_chain, token_address, None);
        let mut metas = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(accounts::config(&self.token_bridge), false),
            AccountMeta::new(*from, false),
            AccountMeta::new_readonly(*from_owner, true),
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(accounts::wrapped_meta(&self.token_bridge, &mint), false),
            AccountMeta::new_readonly(accounts::authority_signer(&self.token_bridge), false),
        ];
        metas.extend(self.message_accounts(message));
        self.finish_transfer(
            metas,
            payer,
            args,
            TokenBridgeInstruction::TransferWrapped,
            TokenBridgeInstruction::TransferWrappedWithPayload,
        )
    }

    fn finish_transfer(
        &self,
        mut metas: Vec<AccountMeta>,
        payer: &Pubkey,
        args: &TransferArgs,
        plain: TokenBridgeInstruction,
        with_payload: TokenBridgeInstruction,
    ) -> Result<Instruction> {
        if let Some(sender) = args.sender(payer) {
            metas.push(AccountMeta::new(sender, true));
        }
        metas.extend([
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(self.core_bridge, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]);

        let data = match args {
            TransferArgs::Plain(data) => encode(plain, data)?,
            TransferArgs::WithPayload(data) => encode(with_payload, data)?,
        };

        Ok(Instruction {
            program_id: self.token_bridge,
            accounts: metas,
            data,
        })
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Release a Solana-native mint from custody
    ///
    /// `to_owner` is required for payload transfers, where only the
    /// recipient may redeem.
    pub fn complete_native(
        &self,
        payer: &Pubkey,
        vaa: &SignedVaa,
        to: &Pubkey,
        to_owner: Option<&Pubkey>,
        fee_recipient: Option<&Pubkey>,
        mint: &Pubkey,
    ) -> Result<Instruction> {
        let mut metas = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(accounts::config(&self.token_bridge), false),
        ];
        metas.extend(self.claimable_vaa(vaa));
        metas.push(AccountMeta::new(*to, false));
        if let Some(owner) = to_owner {
            metas.push(AccountMeta::new_readonly(*owner, true));
        }
        metas.extend([
            AccountMeta::new(*fee_recipient.unwrap_or(to), false),
            AccountMeta::new(accounts::custody(&self.token_bridge, mint), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(accounts::custody_signer(&self.token_bridge), false),
        ]);
        let tag = match to_owner {
            Some(_) => TokenBridgeInstruction::CompleteNativeWithPayload,
            None => TokenBridgeInstruction::CompleteNative,
        };
        self.finish_complete(metas, tag)
    }

    /// Mint a wrapped representation of a foreign asset
    #[allow(clippy::too_many_arguments)]
    pub fn complete_wrapped(
        &self,
        payer: &Pubkey,
        vaa: &SignedVaa,
        to: &Pubkey,
        to_owner: Option<&Pubkey>,
        fee_recipient: Option<&Pubkey>,
        token_chain: u16,
        token_address: &[u8; 32],
    ) -> Result<Instruction> {
        let mint = accounts::wrapped_mint(&self.token_bridge, token_chain, token_address, None);
        let mut metas = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(accounts::config(&self.token_bridge), false),
        ];
        metas.extend(self.claimable_vaa(vaa));
        metas.push(AccountMeta::new(*to, false));
        if let Some(owner) = to_owner {
            metas.push(AccountMeta::new_readonly(*owner, true));
        }
        metas.extend([
            AccountMeta::new(*fee_recipient.unwrap_or(to), false),
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(accounts::wrapped_meta(&self.token_bridge, &mint), false),
            AccountMeta::new_readonly(accounts::mint_signer(&self.token_bridge), false),
        ]);
        let tag = match to_owner {
            Some(_) => TokenBridgeInstruction::CompleteWrappedWithPayload,
            None => TokenBridgeInstruction::CompleteWrapped,
        };
        self.finish_complete(metas, tag)
    }

    fn finish_complete(
        &self,
        mut metas: Vec<AccountMeta>,
        tag: TokenBridgeInstruction,
    ) -> Result<Instruction> {
        metas.extend([
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(self.core_bridge, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]);
        Ok(Instruction {
            program_id: self.token_bridge,
            accounts: metas,
            data: encode(tag, &CompleteData {})?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs() -> BridgePrograms {
        BridgePrograms {
            token_bridge: solana_sdk::pubkey!("wormDTUJ6AWPNvk59vGQbDvGJmqbDTdgWgAqcLBCgUb"),
            core_bridge: solana_sdk::pubkey!("worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth"),
        }
    }

    fn plain_args() -> TransferArgs {
        TransferArgs::Plain(TransferData {
            nonce: 7,
            amount: 1_000,
            fee: 10,
            target_address: [5u8; 32],
            target_chain: 2,
        })
    }

    #[test]
    fn test_transfer_data_layout() {
        let data = encode(
            TokenBridgeInstruction::TransferNative,
            &TransferData {
                nonce: 1,
                amount: 2,
                fee: 3,
                target_address: [4u8; 32],
                target_chain: 5,
            },
        )
        .unwrap();

        assert_eq!(data.len(), 1 + 4 + 8 + 8 + 32 + 2);
        assert_eq!(data[0], 5);
        assert_eq!(&data[1..5], &1u32.to_le_bytes());
        assert_eq!(&data[5..13], &2u64.to_le_bytes());
        assert_eq!(&data[13..21], &3u64.to_le_bytes());
        assert_eq!(&data[21..53], &[4u8; 32]);
        assert_eq!(&data[53..55], &5u16.to_le_bytes());
    }

    #[test]
    fn test_payload_data_layout() {
        let data = encode(
            TokenBridgeInstruction::TransferNativeWithPayload,
            &TransferWithPayloadData {
                nonce: 1,
                amount: 2,
                target_address: [4u8; 32],
                target_chain: 5,
                payload: vec![9, 9],
                cpi_program_id: None,
            },
        )
        .unwrap();

        assert_eq!(data[0], 12);
        // nonce, amount, address, chain, vec len, payload, option tag
        assert_eq!(data.len(), 1 + 4 + 8 + 32 + 2 + 4 + 2 + 1);
        assert_eq!(*data.last().unwrap(), 0);
    }

    #[test]
    fn test_transfer_native_accounts() {
        let p = programs();
        let payer = Pubkey::new_unique();
        let message = Pubkey::new_unique();
        let from = Pubkey::new_unique();
        let mint = spl_token::native_mint::id();

        let ix = p
            .transfer_native(&payer, &message, &from, &mint, &plain_args())
            .unwrap();

        assert_eq!(ix.program_id, p.token_bridge);
        assert_eq!(ix.accounts.len(), 17);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[4].pubkey, accounts::custody(&p.token_bridge, &mint));
        assert_eq!(ix.accounts[8].pubkey, message);
        assert!(ix.accounts[8].is_signer);
        assert_eq!(ix.accounts[16].pubkey, spl_token::id());
        assert_eq!(ix.data[0], TokenBridgeInstruction::TransferNative as u8);
    }

    #[test]
    fn test_transfer_with_payload_adds_sender() {
        let p = programs();
        let payer = Pubkey::new_unique();
        let args = TransferArgs::WithPayload(TransferWithPayloadData {
            nonce: 0,
            amount: 1,
            target_address: [0u8; 32],
            target_chain: 2,
            payload: vec![1],
            cpi_program_id: None,
        });

        let ix = p
            .transfer_wrapped(
                &payer,
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                &payer,
                2,
                &[1u8; 32],
                &args,
            )
            .unwrap();

        assert_eq!(ix.accounts.len(), 18);
        assert_eq!(ix.accounts[13].pubkey, payer);
        assert!(ix.accounts[13].is_signer);
        assert_eq!(ix.data[0], TokenBridgeInstruction::TransferWrappedWithPayload as u8);
    }

    #[test]
    fn test_attest_discriminator() {
        let p = programs();
        let ix = p
            .attest(&Pubkey::new_unique(), &Pubkey::new_unique(), &Pubkey::new_unique(), 42)
            .unwrap();
        assert_eq!(ix.data, vec![1, 42, 0, 0, 0]);
        assert_eq!(ix.accounts.len(), 14);
    }
}
