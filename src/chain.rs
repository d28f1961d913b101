//! Chain identity resolution
//!
//! Every supported chain is a closed [`ChainId`] variant carrying its
//! protocol wire id (u16) and exactly one [`ChainFamily`]. The family decides
//! which operation builder handles the chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

// ============================================================================
// Chain Family
// ============================================================================

/// Execution model shared by a group of chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    /// Contract-call chains (Ethereum and compatibles)
    Evm,
    /// Multi-instruction, account-based transactions
    Solana,
    /// Contract-message chains (Terra, Injective, XPLA)
    CosmWasm,
}

impl ChainFamily {
    pub const ALL: [ChainFamily; 3] =
        [ChainFamily::Evm, ChainFamily::Solana, ChainFamily::CosmWasm];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainFamily::Evm => "evm",
            ChainFamily::Solana => "solana",
            ChainFamily::CosmWasm => "cosmwasm",
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Chain ID
// ============================================================================

/// Supported chains, keyed by protocol wire id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Solana,
    Ethereum,
    Terra,
    Bsc,
    Polygon,
    Avalanche,
    Fantom,
    Celo,
    Moonbeam,
    Terra2,
    Injective,
    Arbitrum,
    Optimism,
    Xpla,
    Base,
    Sepolia,
}

impl ChainId {
    pub const ALL: [ChainId; 16] = [
        ChainId::Solana,
        ChainId::Ethereum,
        ChainId::Terra,
        ChainId::Bsc,
        ChainId::Polygon,
        ChainId::Avalanche,
        ChainId::Fantom,
        ChainId::Celo,
        ChainId::Moonbeam,
        ChainId::Terra2,
        ChainId::Injective,
        ChainId::Arbitrum,
        ChainId::Optimism,
        ChainId::Xpla,
        ChainId::Base,
        ChainId::Sepolia,
    ];

    /// Protocol wire id
    pub const fn to_u16(self) -> u16 {
        match self {
            ChainId::Solana => 1,
            ChainId::Ethereum => 2,
            ChainId::Terra => 3,
            ChainId::Bsc => 4,
            ChainId::Polygon => 5,
            ChainId::Avalanche => 6,
            ChainId::Fantom => 10,
            ChainId::Celo => 14,
            ChainId::Moonbeam => 16,
            ChainId::Terra2 => 18,
            ChainId::Injective => 19,
            ChainId::Arbitrum => 23,
            ChainId::Optimism => 24,
            ChainId::Xpla => 28,
            ChainId::Base => 30,
            ChainId::Sepolia => 10002,
        }
    }

    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            ChainId::Solana => "solana",
            ChainId::Ethereum => "ethereum",
            ChainId::Terra => "terra",
            ChainId::Bsc => "bsc",
            ChainId::Polygon => "polygon",
            ChainId::Avalanche => "avalanche",
            ChainId::Fantom => "fantom",
            ChainId::Celo => "celo",
            ChainId::Moonbeam => "moonbeam",
            ChainId::Terra2 => "terra2",
            ChainId::Injective => "injective",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Optimism => "optimism",
            ChainId::Xpla => "xpla",
            ChainId::Base => "base",
            ChainId::Sepolia => "sepolia",
        }
    }

    pub const fn family(self) -> ChainFamily {
        match self {
            ChainId::Solana => ChainFamily::Solana,
            ChainId::Terra | ChainId::Terra2 | ChainId::Injective | ChainId::Xpla => {
                ChainFamily::CosmWasm
            }
            ChainId::Ethereum
            | ChainId::Bsc
            | ChainId::Polygon
            | ChainId::Avalanche
            | ChainId::Fantom
            | ChainId::Celo
            | ChainId::Moonbeam
            | ChainId::Arbitrum
            | ChainId::Optimism
            | ChainId::Base
            | ChainId::Sepolia => ChainFamily::Evm,
        }
    }

    /// Bech32 human-readable prefix for CosmWasm chains
    pub const fn bech32_prefix(self) -> Option<&'static str> {
        match self {
            ChainId::Terra | ChainId::Terra2 => Some("terra"),
            ChainId::Injective => Some("inj"),
            ChainId::Xpla => Some("xpla"),
            _ => None,
        }
    }

    /// Denomination the token bridge wraps as this chain's native asset
    pub const fn wrapped_native_denom(self) -> Option<&'static str> {
        match self {
            ChainId::Terra | ChainId::Terra2 => Some("uluna"),
            ChainId::Injective => Some("inj"),
            ChainId::Xpla => Some("axpla"),
            _ => None,
        }
    }

    /// Whether `address` names a native denomination rather than a contract
    ///
    /// Always false outside the CosmWasm family.
    pub fn is_native_denom(self, address: &str) -> bool {
        match self {
            ChainId::Terra | ChainId::Terra2 => {
                address == "uluna" || (address.starts_with('u') && address.len() == 4)
            }
            ChainId::Injective => address == "inj",
            ChainId::Xpla => address == "axpla",
            _ => false,
        }
    }

    /// Decimals of a native denomination, `None` for anything else
    pub fn native_denom_decimals(self, denom: &str) -> Option<u8> {
        if !self.is_native_denom(denom) {
            return None;
        }
        match self {
            ChainId::Terra | ChainId::Terra2 => Some(6),
            ChainId::Injective | ChainId::Xpla => Some(18),
            _ => None,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for ChainId {
    type Error = BridgeError;

    fn try_from(id: u16) -> Result<Self> {
        ChainId::ALL
            .into_iter()
            .find(|c| c.to_u16() == id)
            .ok_or_else(|| BridgeError::UnknownChain(id.to_string()))
    }
}

impl From<ChainId> for u16 {
    fn from(chain: ChainId) -> u16 {
        chain.to_u16()
    }
}

impl FromStr for ChainId {
    type Err = BridgeError;

    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        ChainId::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| BridgeError::UnknownChain(name.to_string()))
    }
}

/// Resolve a chain from its name or decimal wire id
pub fn resolve_chain(input: &str) -> Result<ChainId> {
    match input.trim().parse::<u16>() {
        Ok(id) => ChainId::try_from(id),
        Err(_) => input.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_roundtrip() {
        for chain in ChainId::ALL {
            assert_eq!(ChainId::try_from(chain.to_u16()).unwrap(), chain);
            assert_eq!(chain.name().parse::<ChainId>().unwrap(), chain);
        }
    }

    #[test]
    fn test_wire_ids_unique() {
        let mut ids: Vec<u16> = ChainId::ALL.iter().map(|c| c.to_u16()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ChainId::ALL.len());
    }

    #[test]
    fn test_resolve_by_name_and_id() {
        assert_eq!(resolve_chain("Ethereum").unwrap(), ChainId::Ethereum);
        assert_eq!(resolve_chain("19").unwrap(), ChainId::Injective);
        assert_eq!(resolve_chain(" solana ").unwrap(), ChainId::Solana);
    }

    #[test]
    fn test_unknown_chain() {
        assert_eq!(
            resolve_chain("dogechain"),
            Err(BridgeError::UnknownChain("dogechain".to_string()))
        );
        assert!(matches!(
            ChainId::try_from(9999),
            Err(BridgeError::UnknownChain(_))
        ));
    }

    #[test]
    fn test_families() {
        assert_eq!(ChainId::Solana.family(), ChainFamily::Solana);
        assert_eq!(ChainId::Terra2.family(), ChainFamily::CosmWasm);
        assert_eq!(ChainId::Base.family(), ChainFamily::Evm);
        for family in ChainFamily::ALL {
            assert!(ChainId::ALL.iter().any(|c| c.family() == family));
        }
    }

    #[test]
    fn test_native_denoms() {
        assert!(ChainId::Terra.is_native_denom("uluna"));
        assert!(ChainId::Terra.is_native_denom("uusd"));
        assert!(ChainId::Terra2.is_native_denom("ukrw"));
        assert!(!ChainId::Terra.is_native_denom("terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v"));
        assert!(!ChainId::Terra.is_native_denom("uatom1"));
        assert!(ChainId::Injective.is_native_denom("inj"));
        assert!(!ChainId::Injective.is_native_denom("uinj"));
        assert!(ChainId::Xpla.is_native_denom("axpla"));
        assert!(!ChainId::Ethereum.is_native_denom("uluna"));
        assert!(!ChainId::Solana.is_native_denom("inj"));
    }

    #[test]
    fn test_native_denom_decimals() {
        assert_eq!(ChainId::Terra.native_denom_decimals("uluna"), Some(6));
        assert_eq!(ChainId::Injective.native_denom_decimals("inj"), Some(18));
        assert_eq!(ChainId::Xpla.native_denom_decimals("axpla"), Some(18));
        assert_eq!(ChainId::Xpla.native_denom_decimals("uluna"), None);
    }
}
