use serde::{Deserialize, Serialize};

use crate::predictor::ScoringResult;

pub const MEDIUM_RISK_FROM: f64 = 30.0;
pub const HIGH_RISK_FROM: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < MEDIUM_RISK_FROM {
            RiskLevel::Low
        } else if score < HIGH_RISK_FROM {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "This transaction appears to be legitimate with low fraud risk.",
            RiskLevel::Medium => {
                "This transaction shows some unusual patterns but may be legitimate."
            }
            RiskLevel::High => {
                "This transaction has multiple high-risk indicators suggesting potential fraud."
            }
        }
    }
}

/// Risk meter reading: 0 is certainly legitimate, 100 certainly fraud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub label: String,
    pub description: String,
}

impl RiskAssessment {
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
        let level = RiskLevel::from_score(score);
        Self {
            score,
            level,
            label: level.label().to_string(),
            description: level.description().to_string(),
        }
    }

    pub fn from_result(result: &ScoringResult) -> Self {
        Self::from_score(risk_score(result))
    }

    /// Meter state before anything has been analyzed.
    pub fn idle() -> Self {
        Self::from_score(0.0)
    }
}

/// Fold verdict and confidence into one fraud-leaning score.
pub fn risk_score(result: &ScoringResult) -> f64 {
    let pct = result.probability * 100.0;
    let score = if result.prediction.is_fraud() {
        pct
    } else {
        100.0 - pct
    };
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Prediction;

    fn result(prediction: Prediction, probability: f64) -> ScoringResult {
        ScoringResult {
            prediction,
            probability,
            feature_contributions: Vec::new(),
        }
    }

    #[test]
    fn test_fraud_score_is_confidence() {
        let r = result(Prediction::Fraud, 0.82);
        assert!((risk_score(&r) - 82.0).abs() < 1e-9);
        assert_eq!(RiskAssessment::from_result(&r).level, RiskLevel::High);
    }

    #[test]
    fn test_legitimate_score_is_inverted() {
        let r = result(Prediction::Legitimate, 0.9);
        assert!((risk_score(&r) - 10.0).abs() < 1e-9);
        assert_eq!(RiskAssessment::from_result(&r).level, RiskLevel::Low);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(29.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69.99), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
    }

    #[test]
    fn test_score_clamped() {
        assert_eq!(RiskAssessment::from_score(140.0).score, 100.0);
        assert_eq!(RiskAssessment::from_score(-3.0).score, 0.0);
        assert_eq!(RiskAssessment::from_score(f64::NAN).score, 0.0);
    }

    #[test]
    fn test_idle_meter() {
        let idle = RiskAssessment::idle();
        assert_eq!(idle.level, RiskLevel::Low);
        assert_eq!(idle.label, "Low Risk");
    }
}
