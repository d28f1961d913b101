//! Shared fixtures for integration tests
//!
//! In-memory stand-ins for the three connection traits and a builder for
//! signed attestations.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::Value;
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokenbridge_rs::cosmwasm::WasmQuerier;
use tokenbridge_rs::evm::EvmReader;
use tokenbridge_rs::solana::SolanaRpc;
use tokenbridge_rs::vaa::{payload_id, SignedVaa};

pub const EVM_BRIDGE: &str = "0x3ee18B2214AFF97000D974cf647E7C347E8fa585";
pub const EVM_SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const EVM_TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

pub const SOLANA_TOKEN_BRIDGE: &str = "wormDTUJ6AWPNvk59vGQbDvGJmqbDTdgWgAqcLBCgUb";
pub const SOLANA_CORE_BRIDGE: &str = "worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth";
pub const SOLANA_PAYER: &str = "93MB2qRDNVLxbmmPuYpLdAqn3u2x9ZhaVZK5wELHueP8";
pub const SOLANA_MINT: &str = "AByCTxLPRZPoyK22KdMxa3xkCbcNbeNWzVeEvh6UcJs9";

pub const INJ_BRIDGE: &str = "inj1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc54tm65y";
pub const INJ_TOKEN: &str = "inj1yg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyf9qgq";
pub const INJ_SENDER: &str = "inj1xvenxvenxvenxvenxvenxvenxvenxvenkhjaaj";
pub const TERRA_BRIDGE: &str = "terra1g3zyg3zyg3zyg3zyg3zyg3zyg3zyg3zy94hxty";
pub const TERRA_SENDER: &str = "terra124242424242424242424242424242424htqm7k";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

// ============================================================================
// Attestations
// ============================================================================

fn u256(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Signed token transfer attestation with fixed envelope fields
#[derive(Debug, Clone)]
pub struct TransferVaa {
    pub amount: u128,
    pub token_address: [u8; 32],
    pub token_chain: u16,
    pub to: [u8; 32],
    pub to_chain: u16,
    pub fee: u128,
    pub payload: Option<Vec<u8>>,
    pub sequence: u64,
}

impl TransferVaa {
    pub fn new(token_chain: u16, token_address: [u8; 32], to_chain: u16, to: [u8; 32]) -> Self {
        Self {
            amount: 150,
            token_address,
            token_chain,
            to,
            to_chain,
            fee: 0,
            payload: None,
            sequence: 1,
        }
    }

    pub fn amount(mut self, amount: u128) -> Self {
        self.amount = amount;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&1_700_000_000u32.to_be_bytes());
        body.extend_from_slice(&0u32.to_be_bytes());
        body.extend_from_slice(&2u16.to_be_bytes());
        body.extend_from_slice(&[0xEE; 32]);
        body.extend_from_slice(&self.sequence.to_be_bytes());
        body.push(1);

        match &self.payload {
            Some(payload) => {
                body.push(payload_id::TRANSFER_WITH_PAYLOAD);
                body.extend_from_slice(&u256(self.amount));
                body.extend_from_slice(&self.token_address);
                body.extend_from_slice(&self.token_chain.to_be_bytes());
                body.extend_from_slice(&self.to);
                body.extend_from_slice(&self.to_chain.to_be_bytes());
                body.extend_from_slice(&[0xF0; 32]);
                body.extend_from_slice(payload);
            }
            None => {
                body.push(payload_id::TRANSFER);
                body.extend_from_slice(&u256(self.amount));
                body.extend_from_slice(&self.token_address);
                body.extend_from_slice(&self.token_chain.to_be_bytes());
                body.extend_from_slice(&self.to);
                body.extend_from_slice(&self.to_chain.to_be_bytes());
                body.extend_from_slice(&u256(self.fee));
            }
        }

        let mut out = vec![1u8];
        out.extend_from_slice(&0u32.to_be_bytes());
        out.push(1);
        out.push(0);
        out.extend_from_slice(&[0xAB; 65]);
        out.extend_from_slice(&body);
        out
    }

    pub fn signed(&self) -> SignedVaa {
        SignedVaa::decode(&self.bytes()).expect("fixture VAA decodes")
    }
}

// ============================================================================
// EVM
// ============================================================================

/// Answers `eth_call`s by function selector and records every call
#[derive(Default)]
pub struct MockEvmReader {
    responses: HashMap<[u8; 4], Bytes>,
    pub calls: Mutex<Vec<(Address, Bytes)>>,
}

impl MockEvmReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, selector: [u8; 4], output: Vec<u8>) -> Self {
        self.responses.insert(selector, Bytes::from(output));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EvmReader for MockEvmReader {
    async fn call(&self, to: Address, calldata: Bytes) -> eyre::Result<Bytes> {
        self.calls.lock().unwrap().push((to, calldata.clone()));
        let selector: [u8; 4] = calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| eyre::eyre!("short calldata"))?;
        self.responses
            .get(&selector)
            .cloned()
            .ok_or_else(|| eyre::eyre!("execution reverted"))
    }
}

/// An endpoint that never answers in time
pub struct TimeoutEvmReader;

#[async_trait]
impl EvmReader for TimeoutEvmReader {
    async fn call(&self, _to: Address, _calldata: Bytes) -> eyre::Result<Bytes> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err(eyre::eyre!("request timed out"))
    }
}

// ============================================================================
// Solana
// ============================================================================

pub const RENT_EXEMPT_TOKEN_ACCOUNT: u64 = 2_039_280;

/// Static account store
#[derive(Default)]
pub struct MockSolanaRpc {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
}

impl MockSolanaRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.lock().unwrap().insert(address, data);
        self
    }
}

#[async_trait]
impl SolanaRpc for MockSolanaRpc {
    async fn latest_blockhash(&self) -> eyre::Result<Hash> {
        Ok(Hash::new_from_array([7u8; 32]))
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> eyre::Result<u64> {
        Ok(RENT_EXEMPT_TOKEN_ACCOUNT)
    }

    async fn account_data(&self, address: &Pubkey) -> eyre::Result<Option<Vec<u8>>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }
}

pub struct TimeoutSolanaRpc;

#[async_trait]
impl SolanaRpc for TimeoutSolanaRpc {
    async fn latest_blockhash(&self) -> eyre::Result<Hash> {
        Err(eyre::eyre!("request timed out"))
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> eyre::Result<u64> {
        Err(eyre::eyre!("request timed out"))
    }

    async fn account_data(&self, _address: &Pubkey) -> eyre::Result<Option<Vec<u8>>> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err(eyre::eyre!("request timed out"))
    }
}

// ============================================================================
// CosmWasm
// ============================================================================

/// Answers smart queries by contract and top-level message key
#[derive(Default)]
pub struct MockWasmQuerier {
    responses: HashMap<(String, String), Value>,
    pub queries: Mutex<Vec<(String, Value)>>,
}

impl MockWasmQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, contract: &str, query: &str, response: Value) -> Self {
        self.responses
            .insert((contract.to_string(), query.to_string()), response);
        self
    }
}

#[async_trait]
impl WasmQuerier for MockWasmQuerier {
    async fn query_smart(&self, contract: &str, msg: &Value) -> eyre::Result<Value> {
        self.queries
            .lock()
            .unwrap()
            .push((contract.to_string(), msg.clone()));
        let key = msg
            .as_object()
            .and_then(|o| o.keys().next().cloned())
            .ok_or_else(|| eyre::eyre!("query is not an object"))?;
        self.responses
            .get(&(contract.to_string(), key))
            .cloned()
            .ok_or_else(|| eyre::eyre!("Query failed: 500 - contract error"))
    }
}

pub struct TimeoutWasmQuerier;

#[async_trait]
impl WasmQuerier for TimeoutWasmQuerier {
    async fn query_smart(&self, _contract: &str, _msg: &Value) -> eyre::Result<Value> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err(eyre::eyre!("Failed to query contract: operation timed out"))
    }
}
