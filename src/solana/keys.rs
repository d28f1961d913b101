//! Ephemeral keypair sources
//!
//! Message accounts and temporary wrapped-SOL accounts are fresh single-use
//! keys that co-sign the transaction they appear in.

use solana_sdk::signer::keypair::{keypair_from_seed, Keypair};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{BridgeError, Result};

pub trait KeypairSource: Send + Sync {
    fn new_keypair(&self) -> Result<Keypair>;
}

/// Fresh random keys from the OS RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeypairs;

impl KeypairSource for RandomKeypairs {
    fn new_keypair(&self) -> Result<Keypair> {
        Ok(Keypair::new())
    }
}

/// Reproducible keys derived from a base seed and a counter
#[derive(Debug)]
pub struct SeededKeypairs {
    seed: [u8; 32],
    counter: AtomicU64,
}

impl SeededKeypairs {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }
}

impl KeypairSource for SeededKeypairs {
    fn new_keypair(&self) -> Result<Keypair> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut seed = self.seed;
        for (byte, counter_byte) in seed[24..].iter_mut().zip(n.to_be_bytes()) {
            *byte ^= counter_byte;
        }
        keypair_from_seed(&seed).map_err(|e| BridgeError::Encoding(format!("keypair: {}", e)))
    }
}
