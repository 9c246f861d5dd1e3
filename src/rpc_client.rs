use crate::errors::AppError;
use crate::models::{AssetMetadata, Fetched, SupplyInfo};
use serde_json::{json, Value};
use std::time::Duration;

/// Client for the Solana JSON-RPC provider (Helius).
///
/// Both lookups are best-effort: every failure is logged and reported as
/// [`Fetched::Absent`] instead of an error.
#[derive(Clone)]
pub struct TokenRpcClient {
    client: reqwest::Client,
    rpc_url: String,
}

impl TokenRpcClient {
    /// Creates a new `TokenRpcClient`.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - Full JSON-RPC endpoint, including any API key query.
    /// * `timeout` - Upper bound for each outbound request.
    pub fn new(rpc_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create RPC client: {}", e))
            })?;

        Ok(Self { client, rpc_url })
    }

    /// Fetches token metadata via `getAsset`.
    pub async fn get_asset(&self, address: &str) -> Fetched<AssetMetadata> {
        match self.call("getAsset", address).await {
            Ok(Some(result)) => AssetMetadata::from_rpc_result(&result).into(),
            Ok(None) => Fetched::Absent,
            Err(e) => {
                tracing::error!("Error fetching token metadata for {}: {}", address, e);
                Fetched::Absent
            }
        }
    }

    /// Fetches supply and decimals via `getTokenSupply` (`result.value`).
    pub async fn get_token_supply(&self, address: &str) -> Fetched<SupplyInfo> {
        let value = match self.call("getTokenSupply", address).await {
            Ok(Some(result)) => result.get("value").cloned(),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error fetching token supply for {}: {}", address, e);
                None
            }
        };

        let Some(value) = value.filter(|v| v.as_object().is_some_and(|o| !o.is_empty())) else {
            return Fetched::Absent;
        };

        match serde_json::from_value::<SupplyInfo>(value) {
            Ok(supply) => Fetched::Present(supply),
            Err(e) => {
                tracing::error!("Malformed token supply for {}: {}", address, e);
                Fetched::Absent
            }
        }
    }

    /// Sends one JSON-RPC 2.0 request with `address` as the only positional
    /// parameter. Returns `Ok(None)` when the response carries no `result`.
    async fn call(&self, method: &str, address: &str) -> Result<Option<Value>, AppError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "rugpull-detector",
            "method": method,
            "params": [address],
        });

        tracing::debug!("JSON-RPC {} for {}", method, address);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("{} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "{} returned {}: {}",
                method, status, error_text
            )));
        }

        let mut body: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse {} response: {}", method, e))
        })?;

        if let Some(error) = body.get("error") {
            tracing::warn!("{} returned JSON-RPC error for {}: {}", method, address, error);
        }

        Ok(body
            .get_mut("result")
            .map(Value::take)
            .filter(|result| !result.is_null()))
    }
}
