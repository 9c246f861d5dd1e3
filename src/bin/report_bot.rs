use rugpull_detector::api::report_bot_router;
use rugpull_detector::bot_handler::BotState;
use rugpull_detector::config::BotConfig;
use rugpull_detector::db::{Database, RetryPolicy};
use rugpull_detector::ledger::ReportLedger;
use rugpull_detector::risk_api_client::RiskApiClient;
use rugpull_detector::telegram_client::TelegramClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Entry point for the Telegram report bot.
///
/// Startup is explicit: the store connection is established with a bounded
/// retry policy before anything is served, and the process exits with an
/// error if it cannot be reached.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rugpull_detector=debug,report_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env()?;

    let policy = RetryPolicy {
        attempts: config.db_connect_attempts,
        delay: config.db_retry_delay(),
    };
    let db = Database::connect_with_retry(&config.database_url, policy)
        .await
        .inspect_err(|e| tracing::error!("Startup aborted: {}", e))?;
    tracing::info!("Database connection pool established");

    let ledger = ReportLedger::new(db.pool.clone());
    ledger.ensure_schema().await?;
    tracing::info!("Report ledger ready");

    let telegram =
        TelegramClient::new(config.telegram_api_url.clone(), config.telegram_token.clone())?;
    let risk_api = RiskApiClient::new(config.risk_api_url.clone())?;
    tracing::info!("✓ Risk API client initialized: {}", config.risk_api_url);

    if let Some(ref url) = config.webhook_url {
        let webhook = format!("{}/telegram/webhook", url);
        if let Err(e) = telegram
            .set_webhook(&webhook, config.webhook_secret.as_deref())
            .await
        {
            tracing::error!("Failed to register Telegram webhook: {}", e);
        }
    }

    let state = Arc::new(BotState::new(
        ledger,
        telegram,
        risk_api,
        config.webhook_secret.clone(),
    ));

    let app = report_bot_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Report bot listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
