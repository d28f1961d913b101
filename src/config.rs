//! Per-chain connection configuration
//!
//! # Environment Variable Schema
//!
//! ```text
//! BRIDGE_CHAINS=ethereum,solana,injective   # chains to configure, by name
//! BRIDGE_ETHEREUM_RPC_URL=https://...       # RPC (EVM, Solana) or LCD (CosmWasm)
//! BRIDGE_ETHEREUM_TOKEN_BRIDGE=0x...        # token bridge contract or program
//! BRIDGE_SOLANA_CORE_BRIDGE=worm2...        # Solana only: core bridge program
//! BRIDGE_INJECTIVE_TIMEOUT_SECS=30          # optional LCD request timeout
//! ```

use eyre::{eyre, Result};
use std::collections::HashSet;
use std::time::Duration;

use crate::address_codec::{decode_bech32_with_prefix, parse_evm_address, parse_solana_address};
use crate::chain::{resolve_chain, ChainFamily, ChainId};

// ============================================================================
// URL Validation
// ============================================================================

/// Validates that a URL uses http/https and has a host component.
pub fn validate_rpc_url(url_str: &str, name: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url_str).map_err(|e| eyre!("{} must be a valid URL: {}", name, e))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(eyre!(
            "{} must use http:// or https:// scheme, got {}",
            name,
            scheme
        ));
    }

    if parsed.host_str().is_none() {
        return Err(eyre!("{} must have a host component", name));
    }

    if scheme == "http" {
        tracing::warn!("{} uses unencrypted http://, use https:// in production", name);
    }

    Ok(())
}

// ============================================================================
// Chain Configuration
// ============================================================================

/// Connection settings for one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain: ChainId,
    /// JSON-RPC endpoint, or LCD endpoint for CosmWasm chains
    pub rpc_url: String,
    /// Token bridge contract (EVM, CosmWasm) or program id (Solana)
    pub token_bridge: String,
    /// Core bridge program id, Solana only
    pub core_bridge: Option<String>,
    /// HTTP request timeout for LCD queries, none when unset
    pub request_timeout: Option<Duration>,
}

impl ChainConfig {
    pub fn new(chain: ChainId, rpc_url: &str, token_bridge: &str) -> Self {
        Self {
            chain,
            rpc_url: rpc_url.to_string(),
            token_bridge: token_bridge.to_string(),
            core_bridge: None,
            request_timeout: None,
        }
    }

    pub fn with_core_bridge(mut self, core_bridge: &str) -> Self {
        self.core_bridge = Some(core_bridge.to_string());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validate the chain configuration
    pub fn validate(&self) -> Result<()> {
        let var_prefix = env_prefix(self.chain);
        validate_rpc_url(&self.rpc_url, &format!("{}_RPC_URL", var_prefix))?;

        let bridge_ok = match self.chain.family() {
            ChainFamily::Evm => parse_evm_address(&self.token_bridge).map(|_| ()),
            ChainFamily::Solana => parse_solana_address(&self.token_bridge).map(|_| ()),
            ChainFamily::CosmWasm => {
                let prefix = self.chain.bech32_prefix().unwrap_or_default();
                decode_bech32_with_prefix(&self.token_bridge, prefix).map(|_| ())
            }
        };
        bridge_ok.map_err(|e| {
            eyre!(
                "Invalid token bridge address for chain {}: {} ({})",
                self.chain,
                self.token_bridge,
                e
            )
        })?;

        match (self.chain.family(), &self.core_bridge) {
            (ChainFamily::Solana, Some(core)) => {
                parse_solana_address(core).map_err(|e| {
                    eyre!(
                        "Invalid core bridge program for chain {}: {} ({})",
                        self.chain,
                        core,
                        e
                    )
                })?;
            }
            (ChainFamily::Solana, None) => {
                return Err(eyre!("Missing {}_CORE_BRIDGE", var_prefix));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Configuration for every chain the client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    chains: Vec<ChainConfig>,
}

impl BridgeConfig {
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self> {
        let config = Self { chains };
        config.validate()?;
        Ok(config)
    }

    /// Get chain config by chain id
    pub fn get(&self, chain: ChainId) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain == chain)
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(eyre!("At least one chain must be configured"));
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.chain) {
                return Err(eyre!("Duplicate chain: {}", chain.chain));
            }
            chain.validate()?;
        }

        Ok(())
    }
}

// ============================================================================
// Environment Variable Loading
// ============================================================================

fn env_prefix(chain: ChainId) -> String {
    format!("BRIDGE_{}", chain.name().to_uppercase())
}

/// Load bridge config from environment variables.
///
/// Returns `None` if `BRIDGE_CHAINS` is unset or empty.
pub fn load_from_env() -> Result<Option<BridgeConfig>> {
    load_from_vars(|key| std::env::var(key).ok())
}

/// Load bridge config from any variable source
pub fn load_from_vars<F>(var: F) -> Result<Option<BridgeConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let names = match var("BRIDGE_CHAINS") {
        Some(names) if !names.trim().is_empty() => names,
        _ => return Ok(None),
    };

    let mut chains = Vec::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let chain = resolve_chain(name).map_err(|e| eyre!("BRIDGE_CHAINS: {}", e))?;
        let prefix = env_prefix(chain);

        let rpc_url = var(&format!("{}_RPC_URL", prefix))
            .ok_or_else(|| eyre!("Missing {}_RPC_URL", prefix))?;
        let token_bridge = var(&format!("{}_TOKEN_BRIDGE", prefix))
            .ok_or_else(|| eyre!("Missing {}_TOKEN_BRIDGE", prefix))?;

        let request_timeout = match var(&format!("{}_TIMEOUT_SECS", prefix)) {
            Some(secs) => Some(Duration::from_secs(
                secs.trim()
                    .parse()
                    .map_err(|e| eyre!("Invalid {}_TIMEOUT_SECS '{}': {}", prefix, secs, e))?,
            )),
            None => None,
        };

        chains.push(ChainConfig {
            chain,
            rpc_url,
            token_bridge,
            core_bridge: var(&format!("{}_CORE_BRIDGE", prefix)),
            request_timeout,
        });
    }

    Ok(Some(BridgeConfig::new(chains)?))
}
