//! Rug Pull Detector Library
//!
//! Shared code for the two services in this crate: the risk analysis API,
//! which scores Solana tokens from their on-chain metadata and supply, and the
//! Telegram report bot, which keeps a durable count of reported mint
//! addresses.
//!
//! # Modules
//!
//! - `api`: Router construction for both services.
//! - `core`: Domain logic (scoring, ledger, validation, models, errors).
//! - `integrations`: External service clients.
//! - `bot_handler`: Telegram webhook handler and conversation flow.
//! - `config`: Configuration management.
//! - `db`: Database connection with bounded startup retries.
//! - `errors`: Error handling types.
//! - `handlers`: Risk API HTTP handlers.
//! - `ledger`: Report counter storage.
//! - `models`: Core data models.
//! - `risk`: Risk scoring and evaluation.
//! - `risk_api_client`: Client for `GET /analyze`, used by the bot.
//! - `rpc_client`: Solana JSON-RPC provider client.
//! - `telegram_client`: Telegram Bot API client.
//! - `telegram_models`: Telegram update and keyboard models.
//! - `validation`: Report address validation.

pub mod api;
pub mod core;
pub mod integrations;

pub mod bot_handler;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod risk;
pub mod risk_api_client;
pub mod rpc_client;
pub mod telegram_client;
pub mod telegram_models;
pub mod validation;
