//! Predictor API and the result shape every predictor returns.
//!
//! UI collaborators (risk meter, contribution chart, summary table) only ever
//! see `ScoringResult`; swapping the mock for a trained model means adding
//! another `Predictor` impl, nothing downstream changes.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::transaction::TransactionInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Fraud,
    Legitimate,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Fraud => "fraud",
            Prediction::Legitimate => "legitimate",
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Prediction::Fraud)
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input-derived features, in the order contributions are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Amount,
    Time,
    V1,
    V2,
    V3,
    V4,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Amount,
        Feature::Time,
        Feature::V1,
        Feature::V2,
        Feature::V3,
        Feature::V4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Amount => "Amount",
            Feature::Time => "Time",
            Feature::V1 => "V1",
            Feature::V2 => "V2",
            Feature::V3 => "V3",
            Feature::V4 => "V4",
        }
    }
}

/// Signed push toward fraud (positive) or legitimate (negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureContribution {
    #[serde(rename = "featureName")]
    pub feature: Feature,
    pub contribution: f64,
}

impl FeatureContribution {
    pub fn increases_fraud(&self) -> bool {
        self.contribution >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub prediction: Prediction,
    /// Confidence in `prediction`, not the fraud probability.
    pub probability: f64,
    pub feature_contributions: Vec<FeatureContribution>,
}

impl ScoringResult {
    pub fn contribution(&self, feature: Feature) -> Option<f64> {
        self.feature_contributions
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.contribution)
    }
}

/// Interface for anything that can turn a transaction into a verdict.
pub trait Predictor: Send {
    fn predict(&mut self, input: &TransactionInput) -> Result<ScoringResult, ScoreError>;

    /// Model name/type for logs and the analysis envelope.
    fn name(&self) -> &str;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&mut self, input: &TransactionInput) -> Result<ScoringResult, ScoreError> {
        (**self).predict(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_like_dashboard_payload() {
        let result = ScoringResult {
            prediction: Prediction::Fraud,
            probability: 0.8,
            feature_contributions: vec![FeatureContribution {
                feature: Feature::V1,
                contribution: 0.25,
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prediction"], "fraud");
        assert_eq!(json["featureContributions"][0]["featureName"], "V1");
        assert_eq!(json["featureContributions"][0]["contribution"], 0.25);
    }

    #[test]
    fn test_contribution_lookup() {
        let result = ScoringResult {
            prediction: Prediction::Legitimate,
            probability: 0.9,
            feature_contributions: vec![FeatureContribution {
                feature: Feature::Time,
                contribution: -0.1,
            }],
        };
        assert_eq!(result.contribution(Feature::Time), Some(-0.1));
        assert_eq!(result.contribution(Feature::V4), None);
    }
}
