//! CW20 Token Helpers
//!
//! Allowance messages and metadata queries for CW20 tokens.

use cosmwasm_std::Uint128;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use crate::cosmwasm::client::WasmQuerier;

/// CW20 execute messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    /// Increase allowance
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
}

/// CW20 query messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20QueryMsg {
    /// Get token info
    TokenInfo {},
}

/// Expiration type for allowances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    Never {},
}

/// CW20 token info response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Uint128,
}

/// Allowance for `spender` that never expires
pub fn build_increase_allowance_msg(spender: &str, amount: u128) -> Cw20ExecuteMsg {
    Cw20ExecuteMsg::IncreaseAllowance {
        spender: spender.to_string(),
        amount: Uint128::new(amount),
        expires: Some(Expiration::Never {}),
    }
}

/// Query CW20 token info
pub async fn query_token_info(querier: &dyn WasmQuerier, token: &str) -> Result<TokenInfoResponse> {
    let query = serde_json::to_value(Cw20QueryMsg::TokenInfo {})?;
    let response = querier.query_smart(token, &query).await?;
    serde_json::from_value(response)
        .map_err(|e| eyre!("Failed to parse token_info response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_increase_allowance_never_expires() {
        let msg = build_increase_allowance_msg("inj1bridge", 1_000);
        assert_eq!(
            serde_json::to_value(msg).unwrap(),
            json!({
                "increase_allowance": {
                    "spender": "inj1bridge",
                    "amount": "1000",
                    "expires": { "never": {} }
                }
            })
        );
    }

    #[test]
    fn test_token_info_response_parse() {
        let parsed: TokenInfoResponse = serde_json::from_value(json!({
            "name": "Wrapped Ether",
            "symbol": "WETH",
            "decimals": 8,
            "total_supply": "12345"
        }))
        .unwrap();
        assert_eq!(parsed.decimals, 8);
        assert_eq!(parsed.total_supply, Uint128::new(12345));
    }
}
