use crate::config::ApiConfig;
use crate::errors::AppError;
use crate::models::{AnalyzeQuery, AnalyzeResponse};
use crate::risk::RiskEvaluator;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: ApiConfig,
    /// Token risk evaluator backed by the RPC provider.
    pub evaluator: RiskEvaluator,
}

/// GET /
///
/// Describes the service and its endpoints.
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Rug Pull Detector API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health_check": "/health",
            "analyze_token": "/analyze?token=TOKEN_ADDRESS"
        }
    }))
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "environment": state.config.environment
        })),
    )
}

/// GET /analyze?token=<address>
///
/// Scores the token's rug pull risk. Insufficient provider data is reported
/// in the body with HTTP 200; only a missing token (400) or an unexpected
/// failure (500) change the status code.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Query parameters containing the token address.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let token = params
        .token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Token address is required".to_string()))?;

    tracing::info!("GET /analyze - token: {}", token);

    let evaluator = state.evaluator.clone();
    let address = token.clone();
    let response = tokio::spawn(async move { evaluator.analyze(&address).await })
        .await
        .map_err(|e| {
            tracing::error!("Error analyzing token {}: {}", token, e);
            AppError::InternalError(e.to_string())
        })?;

    Ok(Json(response))
}
