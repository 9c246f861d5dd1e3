use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome of a best-effort provider fetch.
///
/// Transport failures, JSON-RPC errors and empty results all collapse into
/// `Absent`, so scoring only ever sees two optional inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Present(T),
    Absent,
}

impl<T> Fetched<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Fetched::Present(value) => Some(value),
            Fetched::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Fetched::Absent)
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Fetched::Present(v),
            None => Fetched::Absent,
        }
    }
}

/// Token metadata returned by the `getAsset` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub frozen: Option<bool>,
}

impl AssetMetadata {
    /// Reads the fields from a `getAsset` result.
    ///
    /// Flat `name`/`symbol`/`frozen` keys win; otherwise the DAS layout
    /// (`content.metadata.*`, `ownership.frozen`) is used. Returns `None` for
    /// a null or empty result, which the provider sends for unknown assets.
    pub fn from_rpc_result(result: &Value) -> Option<Self> {
        let object = result.as_object().filter(|o| !o.is_empty())?;

        let text = |flat: &str| {
            object
                .get(flat)
                .filter(|v| !v.is_null())
                .or_else(|| result.pointer(&format!("/content/metadata/{}", flat)))
                .and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    other if is_truthy(other) => Some(other.to_string()),
                    _ => None,
                })
        };

        let frozen = object
            .get("frozen")
            .filter(|v| !v.is_null())
            .or_else(|| result.pointer("/ownership/frozen"))
            .map(is_truthy);

        Some(Self {
            name: text("name"),
            symbol: text("symbol"),
            frozen,
        })
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn has_symbol(&self) -> bool {
        self.symbol.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen == Some(true)
    }
}

/// Supply information from `getTokenSupply` (`result.value`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplyInfo {
    /// Raw `uiAmount` as sent by the provider. `None` means the key was
    /// missing; `Some(Value::Null)` means it was explicitly null.
    #[serde(rename = "uiAmount", default, deserialize_with = "present_value")]
    pub ui_amount: Option<Value>,
    /// Raw `decimals`. Kept untyped so an odd value only fails the decimals
    /// check instead of discarding the whole supply.
    #[serde(default)]
    pub decimals: Option<Value>,
}

/// Parsed form of [`SupplyInfo::ui_amount`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupplyAmount {
    Parsed(f64),
    Invalid,
}

impl SupplyInfo {
    /// A missing `uiAmount` counts as zero; numbers and numeric strings parse;
    /// anything else is invalid.
    pub fn amount(&self) -> SupplyAmount {
        match &self.ui_amount {
            None => SupplyAmount::Parsed(0.0),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(SupplyAmount::Parsed)
                .unwrap_or(SupplyAmount::Invalid),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(SupplyAmount::Parsed)
                .unwrap_or(SupplyAmount::Invalid),
            Some(_) => SupplyAmount::Invalid,
        }
    }

    /// Missing, null and zero decimals are invalid; any other value passes.
    pub fn has_valid_decimals(&self) -> bool {
        match &self.decimals {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }

    /// `decimals` echoed back to clients, `0` when missing.
    pub fn display_decimals(&self) -> Value {
        self.decimals.clone().unwrap_or_else(|| Value::from(0))
    }

    /// `uiAmount` echoed back to clients, `0` when missing.
    pub fn display_amount(&self) -> Value {
        self.ui_amount.clone().unwrap_or_else(|| Value::from(0))
    }
}

/// Loose truthiness for provider flags: null, false, zero and empty values
/// are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A single contributing check in a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "no metadata available")]
    NoMetadata,
    #[serde(rename = "missing name")]
    MissingName,
    #[serde(rename = "missing symbol")]
    MissingSymbol,
    #[serde(rename = "zero supply")]
    ZeroSupply,
    #[serde(rename = "extremely high supply")]
    ExtremelyHighSupply,
    #[serde(rename = "invalid supply data")]
    InvalidSupplyData,
    #[serde(rename = "invalid decimals")]
    InvalidDecimals,
    #[serde(rename = "token is frozen")]
    Frozen,
}

impl RiskFactor {
    /// Penalty in tenths of a point.
    pub fn weight_tenths(self) -> u32 {
        match self {
            RiskFactor::NoMetadata => 10,
            RiskFactor::MissingName => 2,
            RiskFactor::MissingSymbol => 1,
            RiskFactor::ZeroSupply => 3,
            RiskFactor::ExtremelyHighSupply => 2,
            RiskFactor::InvalidSupplyData => 2,
            RiskFactor::InvalidDecimals => 2,
            RiskFactor::Frozen => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskFactor::NoMetadata => "no metadata available",
            RiskFactor::MissingName => "missing name",
            RiskFactor::MissingSymbol => "missing symbol",
            RiskFactor::ZeroSupply => "zero supply",
            RiskFactor::ExtremelyHighSupply => "extremely high supply",
            RiskFactor::InvalidSupplyData => "invalid supply data",
            RiskFactor::InvalidDecimals => "invalid decimals",
            RiskFactor::Frozen => "token is frozen",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            RiskTier::High
        } else if score > 0.4 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => f.write_str("LOW"),
            RiskTier::Medium => f.write_str("MEDIUM"),
            RiskTier::High => f.write_str("HIGH"),
        }
    }
}

/// Result of evaluating one token. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "token_address")]
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub supply: Value,
    pub decimals: Value,
    #[serde(rename = "risk_score")]
    pub score: f64,
    #[serde(rename = "risk_factors")]
    pub factors: Vec<RiskFactor>,
    #[serde(rename = "risk_level")]
    pub tier: RiskTier,
    pub timestamp: DateTime<Utc>,
}

/// Response body of `GET /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalyzeResponse {
    Success { data: RiskAssessment },
    Error { error: String },
}

/// Query parameters of `GET /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeQuery {
    pub token: Option<String>,
}

/// Persisted report counter for one address.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReportRecord {
    pub address: String,
    pub sent_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
