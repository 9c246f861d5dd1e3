//! Rug pull risk scoring.
//!
//! The score is a fixed sum of independent penalties:
//! 1. No metadata at all scores 1.0 and stops there
//! 2. Name, symbol, supply, decimals and freeze checks add their weights
//! 3. The total is clamped to 1.0 and bucketed into a [`RiskTier`]
use crate::models::{
    AnalyzeResponse, AssetMetadata, Fetched, RiskAssessment, RiskFactor, RiskTier, SupplyAmount,
    SupplyInfo,
};
use crate::rpc_client::TokenRpcClient;
use chrono::{DateTime, Utc};
use std::fmt;

const MAX_SCORE_TENTHS: u32 = 10;
const HIGH_SUPPLY_THRESHOLD: f64 = 1_000_000_000_000.0;

/// Evaluation failure surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationError {
    /// Neither metadata nor supply could be fetched.
    InsufficientData,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::InsufficientData => f.write_str("unable to fetch token data"),
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Scores a token from its (possibly absent) metadata and supply.
///
/// Factors are listed in check order. Weights are summed in tenths so that
/// the tier boundaries compare exactly.
pub fn score_token(
    metadata: Option<&AssetMetadata>,
    supply: Option<&SupplyInfo>,
) -> (f64, Vec<RiskFactor>) {
    let Some(metadata) = metadata else {
        return (1.0, vec![RiskFactor::NoMetadata]);
    };

    let mut factors = Vec::new();

    if !metadata.has_name() {
        factors.push(RiskFactor::MissingName);
    }
    if !metadata.has_symbol() {
        factors.push(RiskFactor::MissingSymbol);
    }

    if let Some(supply) = supply {
        match supply.amount() {
            SupplyAmount::Parsed(amount) if amount == 0.0 => factors.push(RiskFactor::ZeroSupply),
            SupplyAmount::Parsed(amount) if amount > HIGH_SUPPLY_THRESHOLD => {
                factors.push(RiskFactor::ExtremelyHighSupply)
            }
            SupplyAmount::Parsed(_) => {}
            SupplyAmount::Invalid => factors.push(RiskFactor::InvalidSupplyData),
        }
    }

    // Absent supply leaves decimals undefined, which is penalised the same way
    if !supply.is_some_and(SupplyInfo::has_valid_decimals) {
        factors.push(RiskFactor::InvalidDecimals);
    }

    if metadata.is_frozen() {
        factors.push(RiskFactor::Frozen);
    }

    let tenths: u32 = factors.iter().map(|f| f.weight_tenths()).sum();
    let score = f64::from(tenths.min(MAX_SCORE_TENTHS)) / f64::from(MAX_SCORE_TENTHS);

    (score, factors)
}

/// Builds the assessment for `address` from the two fetch outcomes.
pub fn assess(
    address: &str,
    metadata: &Fetched<AssetMetadata>,
    supply: &Fetched<SupplyInfo>,
    now: DateTime<Utc>,
) -> Result<RiskAssessment, EvaluationError> {
    if metadata.is_absent() && supply.is_absent() {
        return Err(EvaluationError::InsufficientData);
    }

    let metadata = metadata.as_option();
    let supply = supply.as_option();
    let (score, factors) = score_token(metadata, supply);

    let label = |value: Option<&String>| {
        value
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    };

    Ok(RiskAssessment {
        address: address.to_string(),
        name: label(metadata.and_then(|m| m.name.as_ref())),
        symbol: label(metadata.and_then(|m| m.symbol.as_ref())),
        supply: supply
            .map(SupplyInfo::display_amount)
            .unwrap_or_else(|| serde_json::Value::from(0)),
        decimals: supply
            .map(SupplyInfo::display_decimals)
            .unwrap_or_else(|| serde_json::Value::from(0)),
        score,
        factors,
        tier: RiskTier::from_score(score),
        timestamp: now,
    })
}

/// Fetches token data from the RPC provider and scores it.
#[derive(Clone)]
pub struct RiskEvaluator {
    rpc: TokenRpcClient,
}

impl RiskEvaluator {
    pub fn new(rpc: TokenRpcClient) -> Self {
        Self { rpc }
    }

    /// Evaluates `address` without validating its format.
    ///
    /// Provider failures degrade to absent data; the only error is
    /// [`EvaluationError::InsufficientData`].
    pub async fn evaluate(&self, address: &str) -> Result<RiskAssessment, EvaluationError> {
        let (metadata, supply) = tokio::join!(
            self.rpc.get_asset(address),
            self.rpc.get_token_supply(address)
        );

        tracing::debug!(
            "Fetched token data for {}: metadata_present={}, supply_present={}",
            address,
            !metadata.is_absent(),
            !supply.is_absent()
        );

        let result = assess(address, &metadata, &supply, Utc::now());
        match &result {
            Ok(assessment) => tracing::info!(
                "Assessed {}: score={:.1} tier={} factors={:?}",
                address,
                assessment.score,
                assessment.tier,
                assessment.factors
            ),
            Err(e) => tracing::warn!("Assessment failed for {}: {}", address, e),
        }
        result
    }

    /// Evaluates and wraps the outcome in the `/analyze` response envelope.
    pub async fn analyze(&self, address: &str) -> AnalyzeResponse {
        match self.evaluate(address).await {
            Ok(data) => AnalyzeResponse::Success { data },
            Err(e) => AnalyzeResponse::Error {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(name: &str, symbol: &str, frozen: bool) -> AssetMetadata {
        AssetMetadata {
            name: Some(name.to_string()),
            symbol: Some(symbol.to_string()),
            frozen: Some(frozen),
        }
    }

    fn supply(ui_amount: serde_json::Value, decimals: u32) -> SupplyInfo {
        SupplyInfo {
            ui_amount: Some(ui_amount),
            decimals: Some(json!(decimals)),
        }
    }

    #[test]
    fn clean_token_scores_zero() {
        let (score, factors) = score_token(
            Some(&metadata("Bonk", "BONK", false)),
            Some(&supply(json!(1_000_000.0), 5)),
        );
        assert_eq!(score, 0.0);
        assert!(factors.is_empty());
    }

    #[test]
    fn zero_takes_precedence_over_other_supply_checks() {
        let (_, factors) = score_token(
            Some(&metadata("A", "A", false)),
            Some(&supply(json!(0), 6)),
        );
        assert_eq!(factors, vec![RiskFactor::ZeroSupply]);
    }

    #[test]
    fn high_supply_threshold_is_exclusive() {
        let (_, at_threshold) = score_token(
            Some(&metadata("A", "A", false)),
            Some(&supply(json!(1e12), 6)),
        );
        assert!(at_threshold.is_empty());

        let (score, above) = score_token(
            Some(&metadata("A", "A", false)),
            Some(&supply(json!(1e12 + 1.0), 6)),
        );
        assert_eq!(above, vec![RiskFactor::ExtremelyHighSupply]);
        assert_eq!(score, 0.2);
    }

    #[test]
    fn absent_supply_still_penalises_decimals() {
        let (score, factors) = score_token(Some(&metadata("A", "A", false)), None);
        assert_eq!(factors, vec![RiskFactor::InvalidDecimals]);
        assert_eq!(score, 0.2);
    }

    #[test]
    fn medium_boundary_is_exact() {
        // 0.1 + 0.3 + 0.3 lands on 0.7, which must stay MEDIUM
        let (score, _) = score_token(
            Some(&metadata("A", "", true)),
            Some(&supply(json!(0), 9)),
        );
        assert_eq!(score, 0.7);
        assert_eq!(RiskTier::from_score(score), RiskTier::Medium);
    }

    #[test]
    fn assess_fills_defaults() {
        let assessment = assess(
            "So11111111111111111111111111111111111111112",
            &Fetched::Absent,
            &Fetched::Present(SupplyInfo::default()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(assessment.name, "Unknown");
        assert_eq!(assessment.symbol, "Unknown");
        assert_eq!(assessment.supply, json!(0));
        assert_eq!(assessment.decimals, json!(0));
        assert_eq!(assessment.factors, vec![RiskFactor::NoMetadata]);
    }
}
