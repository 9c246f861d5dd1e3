/// Unit tests for risk scoring
/// Covers the scoring rules, factor ordering, clamping and the insufficient-data case
use chrono::Utc;
use rugpull_detector::models::{AssetMetadata, Fetched, RiskFactor, RiskTier, SupplyInfo};
use rugpull_detector::risk::{assess, score_token, EvaluationError};
use serde_json::json;

const MINT: &str = "4cRkQ2dntpusYag6Zmvco8T78WxK9Jqh1eEZJox8pump";

fn metadata(name: Option<&str>, symbol: Option<&str>, frozen: Option<bool>) -> AssetMetadata {
    AssetMetadata {
        name: name.map(str::to_string),
        symbol: symbol.map(str::to_string),
        frozen,
    }
}

fn supply(value: serde_json::Value) -> SupplyInfo {
    serde_json::from_value(value).unwrap()
}

#[cfg(test)]
mod scoring_tests {
    use super::*;

    #[test]
    fn test_missing_name_and_symbol_with_healthy_supply() {
        let meta = metadata(Some(""), Some(""), Some(false));
        let supply = supply(json!({ "uiAmount": 500, "decimals": 6 }));

        let (score, factors) = score_token(Some(&meta), Some(&supply));

        assert_eq!(score, 0.3);
        assert_eq!(factors, vec![RiskFactor::MissingName, RiskFactor::MissingSymbol]);
        assert_eq!(RiskTier::from_score(score), RiskTier::Low);
    }

    #[test]
    fn test_all_penalties_clamp_to_one() {
        let meta = metadata(None, None, Some(true));
        let supply = supply(json!({ "uiAmount": 0, "decimals": 0 }));

        let (score, factors) = score_token(Some(&meta), Some(&supply));

        assert_eq!(score, 1.0);
        assert_eq!(
            factors,
            vec![
                RiskFactor::MissingName,
                RiskFactor::MissingSymbol,
                RiskFactor::ZeroSupply,
                RiskFactor::InvalidDecimals,
                RiskFactor::Frozen,
            ]
        );
        assert_eq!(RiskTier::from_score(score), RiskTier::High);
    }

    #[test]
    fn test_missing_metadata_dominates() {
        let malformed = supply(json!({ "uiAmount": "not-a-number", "decimals": 0 }));

        let (score, factors) = score_token(None, Some(&malformed));

        assert_eq!(score, 1.0);
        assert_eq!(factors, vec![RiskFactor::NoMetadata]);
    }

    #[test]
    fn test_invalid_supply_data() {
        let meta = metadata(Some("Token"), Some("TKN"), Some(false));
        let malformed = supply(json!({ "uiAmount": null, "decimals": 9 }));

        let (score, factors) = score_token(Some(&meta), Some(&malformed));

        assert_eq!(score, 0.2);
        assert_eq!(factors, vec![RiskFactor::InvalidSupplyData]);
    }

    #[test]
    fn test_extremely_high_supply_from_string_amount() {
        let meta = metadata(Some("Token"), Some("TKN"), None);
        let huge = supply(json!({ "uiAmount": "5000000000000", "decimals": 9 }));

        let (_, factors) = score_token(Some(&meta), Some(&huge));

        assert_eq!(factors, vec![RiskFactor::ExtremelyHighSupply]);
    }

    #[test]
    fn test_medium_tier() {
        // 0.2 (name) + 0.3 (frozen)
        let meta = metadata(None, Some("TKN"), Some(true));
        let healthy = supply(json!({ "uiAmount": 1000, "decimals": 6 }));

        let (score, _) = score_token(Some(&meta), Some(&healthy));

        assert_eq!(score, 0.5);
        assert_eq!(RiskTier::from_score(score), RiskTier::Medium);
    }

    #[test]
    fn test_clean_token_is_low_risk() {
        let meta = metadata(Some("Token"), Some("TKN"), Some(false));
        let healthy = supply(json!({ "uiAmount": 1000, "decimals": 6 }));

        let (score, factors) = score_token(Some(&meta), Some(&healthy));

        assert_eq!(score, 0.0);
        assert!(factors.is_empty());
    }
}

#[cfg(test)]
mod assessment_tests {
    use super::*;

    #[test]
    fn test_no_data_is_an_error_not_a_score() {
        let result = assess(MINT, &Fetched::Absent, &Fetched::Absent, Utc::now());

        assert_eq!(result, Err(EvaluationError::InsufficientData));
        assert_eq!(
            EvaluationError::InsufficientData.to_string(),
            "unable to fetch token data"
        );
    }

    #[test]
    fn test_metadata_only_assessment() {
        let meta = metadata(Some("Token"), Some("TKN"), Some(false));

        let assessment = assess(MINT, &Fetched::Present(meta), &Fetched::Absent, Utc::now()).unwrap();

        assert_eq!(assessment.address, MINT);
        assert_eq!(assessment.name, "Token");
        assert_eq!(assessment.symbol, "TKN");
        assert_eq!(assessment.supply, json!(0));
        assert_eq!(assessment.decimals, json!(0));
        assert_eq!(assessment.factors, vec![RiskFactor::InvalidDecimals]);
        assert_eq!(assessment.tier, RiskTier::Low);
    }

    #[test]
    fn test_success_wire_format() {
        let meta = metadata(Some("Token"), Some("TKN"), Some(false));
        let healthy = supply(json!({ "uiAmount": 1000.5, "decimals": 6 }));

        let assessment = assess(
            MINT,
            &Fetched::Present(meta),
            &Fetched::Present(healthy),
            Utc::now(),
        )
        .unwrap();
        let body = serde_json::to_value(&assessment).unwrap();

        assert_eq!(body["token_address"], MINT);
        assert_eq!(body["supply"], json!(1000.5));
        assert_eq!(body["decimals"], 6);
        assert_eq!(body["risk_score"], 0.0);
        assert_eq!(body["risk_factors"], json!([]));
        assert_eq!(body["risk_level"], "LOW");
        assert!(body["timestamp"].is_string());
    }
}
