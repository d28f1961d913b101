//! CosmWasm smart-query access
//!
//! [`WasmQuerier`] is the one read capability the builders need;
//! [`LcdClient`] implements it over the LCD REST API.

use async_trait::async_trait;
use base64::Engine;
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Read-only smart contract queries
#[async_trait]
pub trait WasmQuerier: Send + Sync {
    /// Run `msg` as a smart query against `contract`, returning the `data`
    /// field of the response
    async fn query_smart(&self, contract: &str, msg: &Value) -> Result<Value>;
}

/// LCD REST query client
pub struct LcdClient {
    /// LCD URL
    lcd_url: String,
    /// HTTP client
    client: Client,
}

impl LcdClient {
    /// Create a new query client
    ///
    /// Requests carry no timeout; callers bound them with their own deadline
    /// or use [`LcdClient::with_timeout`].
    pub fn new(lcd_url: &str) -> Result<Self> {
        Self::build(lcd_url, Client::builder())
    }

    pub fn with_timeout(lcd_url: &str, timeout: Duration) -> Result<Self> {
        Self::build(lcd_url, Client::builder().timeout(timeout))
    }

    fn build(lcd_url: &str, builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder.build().wrap_err("Failed to build HTTP client")?;

        info!(lcd_url = %lcd_url, "Created CosmWasm LCD client");

        Ok(Self {
            lcd_url: lcd_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn smart_query_url(&self, contract: &str, msg: &Value) -> Result<String> {
        let query_json = serde_json::to_string(msg)?;
        let query_b64 = base64::engine::general_purpose::STANDARD.encode(query_json);
        Ok(format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.lcd_url, contract, query_b64
        ))
    }
}

#[async_trait]
impl WasmQuerier for LcdClient {
    async fn query_smart(&self, contract: &str, msg: &Value) -> Result<Value> {
        let url = self.smart_query_url(contract, msg)?;

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err("Failed to query contract")?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Query failed: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let mut data: Value = response.json().await?;
        data.get_mut("data")
            .map(Value::take)
            .ok_or_else(|| eyre!("Missing 'data' field in response"))
    }
}
