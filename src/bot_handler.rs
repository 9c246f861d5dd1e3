use crate::errors::AppError;
use crate::ledger::ReportLedger;
use crate::models::{AnalyzeResponse, RiskAssessment};
use crate::risk_api_client::RiskApiClient;
use crate::telegram_client::TelegramClient;
use crate::telegram_models::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update, WebhookAck,
};
use crate::validation::{is_valid_report_address, rejection_message};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// What the bot does with the next address a chat sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Report,
    Check,
    Analyze,
}

impl Intent {
    pub fn callback_data(self) -> &'static str {
        match self {
            Intent::Report => "report",
            Intent::Check => "check",
            Intent::Analyze => "analyze",
        }
    }

    /// Parses button callback data or a command name (`report`, `check`, `analyze`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "report" => Some(Intent::Report),
            "check" => Some(Intent::Check),
            "analyze" => Some(Intent::Analyze),
            _ => None,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Intent::Report => "Send me the mint address you want to report.",
            Intent::Check => "Send me the mint address to check how often it was reported.",
            Intent::Analyze => "Send me the mint address to analyze.",
        }
    }
}

/// A slash command split into its name and optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub argument: Option<String>,
}

/// Parses `/name[@bot] [argument]`. Returns `None` for plain text.
pub fn parse_command(text: &str) -> Option<Command> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, argument) = match rest.split_once(char::is_whitespace) {
        Some((head, arg)) => (head, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    let name = head.split('@').next().unwrap_or(head).to_lowercase();

    Some(Command {
        name,
        argument: argument.map(str::to_string),
    })
}

pub fn main_menu() -> InlineKeyboardMarkup {
    let button = |text: &str, intent: Intent| InlineKeyboardButton {
        text: text.to_string(),
        callback_data: intent.callback_data().to_string(),
    };

    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![button("🚩 Report", Intent::Report), button("🔎 Check", Intent::Check)],
            vec![button("📊 Analyze", Intent::Analyze)],
        ],
    }
}

pub const WELCOME_TEXT: &str = "Welcome! Send me a mint address to report it, \
or pick an action below.";

pub const HELP_TEXT: &str = "Commands:\n\
/report <address> - report a suspicious mint address\n\
/check <address> - see how many times an address was reported\n\
/analyze <address> - get a rug pull risk analysis\n\
Plain addresses are reported unless you picked another action first.";

/// Renders a risk assessment as a chat reply.
pub fn render_assessment(assessment: &RiskAssessment) -> String {
    let mut text = format!(
        "Risk analysis for {} ({})\nAddress: {}\nRisk level: {}\nRisk score: {:.1}",
        assessment.name, assessment.symbol, assessment.address, assessment.tier, assessment.score
    );

    if assessment.factors.is_empty() {
        text.push_str("\nNo risk factors found.");
    } else {
        text.push_str("\nRisk factors:");
        for factor in &assessment.factors {
            text.push_str("\n- ");
            text.push_str(factor.as_str());
        }
    }
    text
}

pub fn render_count(count: i64) -> String {
    match count {
        0 => "This address has not been reported yet.".to_string(),
        1 => "This address has been reported 1 time.".to_string(),
        n => format!("This address has been reported {} times.", n),
    }
}

/// Shared state of the bot server.
#[derive(Clone)]
pub struct BotState {
    pub ledger: ReportLedger,
    pub telegram: TelegramClient,
    pub risk_api: RiskApiClient,
    /// Pending intent per chat id, set by a button or a bare command.
    pub pending: Cache<i64, Intent>,
    pub webhook_secret: Option<String>,
}

impl BotState {
    pub fn new(
        ledger: ReportLedger,
        telegram: TelegramClient,
        risk_api: RiskApiClient,
        webhook_secret: Option<String>,
    ) -> Self {
        // Abandoned prompts expire after 10 minutes
        let pending = Cache::builder()
            .time_to_live(Duration::from_secs(600))
            .max_capacity(10_000)
            .build();

        Self {
            ledger,
            telegram,
            risk_api,
            pending,
            webhook_secret,
        }
    }
}

/// Health check endpoint for the bot server.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "report-bot",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Telegram webhook handler.
///
/// Always acknowledges a well-formed update once authenticated; a failure
/// while handling one update is logged so Telegram does not redeliver it.
pub async fn telegram_webhook(
    State(state): State<Arc<BotState>>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<Json<WebhookAck>, AppError> {
    validate_webhook_secret(&state, &headers)?;

    tracing::debug!("Received Telegram update {}", update.update_id);

    if let Err(e) = handle_update(&state, update).await {
        tracing::error!("Failed to handle Telegram update: {}", e);
    }

    Ok(Json(WebhookAck { ok: true }))
}

fn validate_webhook_secret(state: &BotState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(ref expected_secret) = state.webhook_secret else {
        return Ok(());
    };

    let token = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", SECRET_HEADER)))?;

    if !constant_time_compare(token, expected_secret) {
        tracing::warn!("Invalid webhook secret received");
        return Err(AppError::Unauthorized("Invalid webhook secret".to_string()));
    }

    Ok(())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

pub async fn handle_update(state: &BotState, update: Update) -> Result<(), AppError> {
    if let Some(callback) = update.callback_query {
        return handle_callback(state, callback).await;
    }

    match update.message {
        Some(message) => handle_message(state, message).await,
        None => Ok(()),
    }
}

async fn handle_callback(state: &BotState, callback: CallbackQuery) -> Result<(), AppError> {
    // The button press still counts when the acknowledgement fails
    if let Err(e) = state.telegram.answer_callback_query(&callback.id).await {
        tracing::warn!("Failed to answer callback query {}: {}", callback.id, e);
    }

    let Some(chat_id) = callback.message.as_ref().map(|m| m.chat.id) else {
        return Ok(());
    };

    match callback.data.as_deref().and_then(Intent::parse) {
        Some(intent) => {
            state.pending.insert(chat_id, intent).await;
            state.telegram.send_message(chat_id, intent.prompt(), None).await
        }
        None => {
            tracing::debug!("Ignoring unknown callback data: {:?}", callback.data);
            Ok(())
        }
    }
}

async fn handle_message(state: &BotState, message: Message) -> Result<(), AppError> {
    let chat_id = message.chat.id;
    let Some(text) = message.text.as_deref().map(str::trim) else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }

    if let Some(command) = parse_command(text) {
        return handle_command(state, chat_id, command).await;
    }

    let intent = state.pending.remove(&chat_id).await.unwrap_or(Intent::Report);
    let reply = run_intent(state, intent, text).await;
    state.telegram.send_message(chat_id, &reply, None).await
}

async fn handle_command(state: &BotState, chat_id: i64, command: Command) -> Result<(), AppError> {
    match command.name.as_str() {
        "start" => {
            state.pending.invalidate(&chat_id).await;
            state
                .telegram
                .send_message(chat_id, WELCOME_TEXT, Some(&main_menu()))
                .await
        }
        "help" => state.telegram.send_message(chat_id, HELP_TEXT, None).await,
        name => match (Intent::parse(name), command.argument) {
            (Some(intent), Some(address)) => {
                state.pending.invalidate(&chat_id).await;
                let reply = run_intent(state, intent, &address).await;
                state.telegram.send_message(chat_id, &reply, None).await
            }
            (Some(intent), None) => {
                state.pending.insert(chat_id, intent).await;
                state.telegram.send_message(chat_id, intent.prompt(), None).await
            }
            (None, _) => {
                state
                    .telegram
                    .send_message(chat_id, "Unknown command. Try /help.", None)
                    .await
            }
        },
    }
}

/// Validates `address` and performs `intent`, returning the reply text.
pub async fn run_intent(state: &BotState, intent: Intent, address: &str) -> String {
    if !is_valid_report_address(address) {
        tracing::info!("Rejected {:?} submission: invalid address format", intent);
        return rejection_message();
    }

    match intent {
        Intent::Report => match state.ledger.report(address).await {
            Ok(count) => format!(
                "Valid mint address! It has been saved. {}",
                render_count(count)
            ),
            Err(e) => {
                tracing::error!("Report not recorded for {}: {}", address, e);
                "Sorry, your report could not be recorded right now. Please try again later."
                    .to_string()
            }
        },
        Intent::Check => match state.ledger.get_count(address).await {
            Ok(count) => render_count(count),
            Err(e) => {
                tracing::error!("Report count lookup failed for {}: {}", address, e);
                "Sorry, I could not look up that address right now. Please try again later."
                    .to_string()
            }
        },
        Intent::Analyze => match state.risk_api.analyze(address).await {
            Ok(AnalyzeResponse::Success { data }) => render_assessment(&data),
            Ok(AnalyzeResponse::Error { error }) => format!("Analysis failed: {}", error),
            Err(e) => {
                tracing::error!("Risk API call failed for {}: {}", address, e);
                "Sorry, the risk analysis service is unavailable right now.".to_string()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskFactor, RiskTier};
    use chrono::Utc;

    #[test]
    fn parses_commands_with_bot_suffix_and_argument() {
        assert_eq!(
            parse_command("/check@RugRadarBot  4cRk...pump "),
            Some(Command {
                name: "check".to_string(),
                argument: Some("4cRk...pump".to_string()),
            })
        );
        assert_eq!(
            parse_command("/START"),
            Some(Command {
                name: "start".to_string(),
                argument: None,
            })
        );
        assert_eq!(parse_command("4cRk...pump"), None);
    }

    #[test]
    fn intents_round_trip_through_callback_data() {
        for intent in [Intent::Report, Intent::Check, Intent::Analyze] {
            assert_eq!(Intent::parse(intent.callback_data()), Some(intent));
        }
        assert_eq!(Intent::parse("delete"), None);
    }

    #[test]
    fn menu_offers_all_intents() {
        let data: Vec<String> = main_menu()
            .inline_keyboard
            .into_iter()
            .flatten()
            .map(|b| b.callback_data)
            .collect();
        assert_eq!(data, vec!["report", "check", "analyze"]);
    }

    #[test]
    fn count_wording() {
        assert_eq!(render_count(0), "This address has not been reported yet.");
        assert_eq!(render_count(1), "This address has been reported 1 time.");
        assert_eq!(render_count(3), "This address has been reported 3 times.");
    }

    #[test]
    fn assessment_lists_factors() {
        let text = render_assessment(&RiskAssessment {
            address: "addr".to_string(),
            name: "Unknown".to_string(),
            symbol: "Unknown".to_string(),
            supply: json!(0),
            decimals: json!(0),
            score: 0.5,
            factors: vec![RiskFactor::MissingName, RiskFactor::ZeroSupply],
            tier: RiskTier::Medium,
            timestamp: Utc::now(),
        });
        assert!(text.contains("Risk level: MEDIUM"));
        assert!(text.contains("Risk score: 0.5"));
        assert!(text.contains("- missing name\n- zero supply"));
    }

    #[test]
    fn secret_comparison() {
        assert!(constant_time_compare("s3cret", "s3cret"));
        assert!(!constant_time_compare("s3cret", "s3cre7"));
        assert!(!constant_time_compare("s3cret", "s3cret!"));
    }
}
