use rugpull_detector::api::risk_api_router;
use rugpull_detector::config::ApiConfig;
use rugpull_detector::handlers::AppState;
use rugpull_detector::risk::RiskEvaluator;
use rugpull_detector::rpc_client::TokenRpcClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the risk analysis API.
///
/// Initializes tracing, loads configuration, builds the RPC-backed evaluator
/// and serves the router. Client addresses are attached to each connection
/// for the per-IP rate limiter.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rugpull_detector=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let rpc = TokenRpcClient::new(config.rpc_url.clone(), config.rpc_timeout())?;
    tracing::info!(
        "✓ RPC client initialized (timeout {}s)",
        config.rpc_timeout_secs
    );

    let app_state = Arc::new(AppState {
        config: config.clone(),
        evaluator: RiskEvaluator::new(rpc),
    });

    let app = risk_api_router(app_state)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Risk API listening on {} ({})",
        addr,
        config.environment
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
