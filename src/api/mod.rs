// HTTP surface of both services: route tables plus re-exported handlers
use crate::bot_handler::BotState;
use crate::handlers::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod handlers {
    pub use crate::handlers::*;
}

pub mod bot_handler {
    pub use crate::bot_handler::*;
}

/// Routes of the risk analysis API.
///
/// `/analyze` is rate limited per client IP (10 req/s, burst 20); `/` and
/// `/health` are not.
pub fn risk_api_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let limited_routes = Router::new()
        .route("/analyze", get(crate::handlers::analyze))
        .layer(GovernorLayer {
            config: governor_conf,
        });

    Ok(Router::new()
        .route("/", get(crate::handlers::home))
        .route("/health", get(crate::handlers::health))
        .merge(limited_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}

/// Routes of the Telegram report bot.
pub fn report_bot_router(state: Arc<BotState>) -> Router {
    Router::new()
        .route("/health", get(crate::bot_handler::health))
        .route("/telegram/webhook", post(crate::bot_handler::telegram_webhook))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Telegram updates are small; 1MB is generous
                .layer(RequestBodyLimitLayer::new(1024 * 1024)),
        )
}
