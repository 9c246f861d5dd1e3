use crate::errors::AppError;
use crate::models::AnalyzeResponse;
use std::time::Duration;

/// Client the bot uses to call the risk API's `GET /analyze`.
#[derive(Clone)]
pub struct RiskApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl RiskApiClient {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create risk API client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Requests an analysis of `address`.
    ///
    /// Error envelopes from the API (including 400/500 bodies) are returned as
    /// [`AnalyzeResponse::Error`]; only transport failures and unreadable
    /// bodies become `Err`.
    pub async fn analyze(&self, address: &str) -> Result<AnalyzeResponse, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/analyze", self.base_url),
            &[("token", address)],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Requesting risk analysis for {}", address);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Risk API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to read risk API body: {}", e)))?;

        serde_json::from_str::<AnalyzeResponse>(&body).map_err(|e| {
            AppError::ExternalApiError(format!(
                "Risk API returned {} with unexpected body: {}",
                status, e
            ))
        })
    }
}
