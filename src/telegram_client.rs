use crate::errors::AppError;
use crate::telegram_models::{InlineKeyboardMarkup, TelegramResponse};
use serde_json::{json, Value};
use std::time::Duration;

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Creates a new `TelegramClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Bot API root, normally `https://api.telegram.org`.
    /// * `token` - The bot token issued by BotFather.
    pub fn new(base_url: String, token: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Telegram client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Sends a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), AppError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = keyboard {
            body["reply_markup"] = json!(markup);
        }

        self.call("sendMessage", &body).await
    }

    /// Acknowledges a button press so the client stops showing a spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), AppError> {
        self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await
    }

    /// Registers `url` as the bot's webhook.
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), AppError> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }

        self.call("setWebhook", &body).await?;
        tracing::info!("Telegram webhook registered: {}", url);
        Ok(())
    }

    async fn call(&self, method: &str, body: &Value) -> Result<(), AppError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        // The token is part of the path, so only the method is logged
        tracing::debug!("Telegram API call: {}", method);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!(
                    "Telegram {} request failed: {}",
                    method,
                    e.without_url()
                ))
            })?;

        let status = response.status();
        let parsed: Option<TelegramResponse> = response.json().await.ok();

        match parsed {
            Some(reply) if status.is_success() && reply.ok => Ok(()),
            Some(reply) => Err(AppError::ExternalApiError(format!(
                "Telegram {} returned {}: {}",
                method,
                status,
                reply.description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(AppError::ExternalApiError(format!(
                "Telegram {} returned {} with an unreadable body",
                method, status
            ))),
        }
    }
}
