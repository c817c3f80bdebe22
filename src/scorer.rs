//! Mock risk scorer.
//!
//! Threshold-and-random stand-in for a fraud model: the thresholds are
//! deterministic, the verdict and confidence are drawn from an injected RNG.
//! Every constant here is a demo value with no derivation behind it; none of
//! it carries over if a trained model replaces this predictor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::predictor::{Feature, FeatureContribution, Prediction, Predictor, ScoringResult};
use crate::transaction::TransactionInput;

pub const HIGH_AMOUNT_THRESHOLD: f64 = 1000.0;
pub const PCA_OUTLIER_THRESHOLD: f64 = -3.0;

pub const HIGH_AMOUNT_FRAUD_RATE: f64 = 0.5;
pub const PCA_OUTLIER_FRAUD_RATE: f64 = 0.3;
pub const BASELINE_FRAUD_RATE: f64 = 0.1;

pub const CONFIDENCE_FLOOR: f64 = 0.70;
pub const FRAUD_CONFIDENCE_CEIL: f64 = 1.00;
pub const LEGIT_CONFIDENCE_CEIL: f64 = 0.95;

pub const AMOUNT_CONTRIB_THRESHOLD: f64 = 500.0;
pub const TIME_CONTRIB_THRESHOLD: f64 = 10_000.0;

/// Which predicate picked the fraud rate for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBranch {
    /// amount > 1000
    HighAmount,
    /// v1 < -3 or v2 < -3
    PcaOutlier,
    Baseline,
}

impl RiskBranch {
    pub fn for_input(input: &TransactionInput) -> Self {
        if input.amount > HIGH_AMOUNT_THRESHOLD {
            RiskBranch::HighAmount
        } else if input.v1 < PCA_OUTLIER_THRESHOLD || input.v2 < PCA_OUTLIER_THRESHOLD {
            RiskBranch::PcaOutlier
        } else {
            RiskBranch::Baseline
        }
    }

    pub fn fraud_rate(&self) -> f64 {
        match self {
            RiskBranch::HighAmount => HIGH_AMOUNT_FRAUD_RATE,
            RiskBranch::PcaOutlier => PCA_OUTLIER_FRAUD_RATE,
            RiskBranch::Baseline => BASELINE_FRAUD_RATE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBranch::HighAmount => "high_amount",
            RiskBranch::PcaOutlier => "pca_outlier",
            RiskBranch::Baseline => "baseline",
        }
    }
}

/// Reject what the form layer should already have caught.
pub fn validate(input: &TransactionInput) -> Result<(), ScoreError> {
    for (field, value) in [("amount", input.amount), ("time", input.time_offset)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ScoreError::InvalidInput { field, value });
        }
    }
    Ok(())
}

/// Fixed-magnitude contributions; only the sign depends on the input.
pub fn feature_contributions(input: &TransactionInput) -> Vec<FeatureContribution> {
    Feature::ALL
        .iter()
        .map(|&feature| {
            let contribution = match feature {
                Feature::Amount => pick(input.amount > AMOUNT_CONTRIB_THRESHOLD, 0.40, -0.30),
                Feature::Time => pick(input.time_offset > TIME_CONTRIB_THRESHOLD, 0.20, -0.10),
                Feature::V1 => pick(input.v1 < 0.0, 0.25, -0.20),
                Feature::V2 => pick(input.v2 < 0.0, 0.15, -0.25),
                Feature::V3 => pick(input.v3 < 0.0, 0.30, -0.15),
                Feature::V4 => pick(input.v4 < 0.0, 0.10, -0.30),
            };
            FeatureContribution {
                feature,
                contribution,
            }
        })
        .collect()
}

fn pick(cond: bool, when_true: f64, when_false: f64) -> f64 {
    if cond {
        when_true
    } else {
        when_false
    }
}

pub struct MockRiskScorer<R: Rng = StdRng> {
    rng: R,
}

impl MockRiskScorer<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> MockRiskScorer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn score(&mut self, input: &TransactionInput) -> Result<ScoringResult, ScoreError> {
        validate(input)?;

        let branch = RiskBranch::for_input(input);
        let prediction = if self.rng.gen_bool(branch.fraud_rate()) {
            Prediction::Fraud
        } else {
            Prediction::Legitimate
        };

        let ceil = match prediction {
            Prediction::Fraud => FRAUD_CONFIDENCE_CEIL,
            Prediction::Legitimate => LEGIT_CONFIDENCE_CEIL,
        };
        let probability = self.rng.gen_range(CONFIDENCE_FLOOR..=ceil);

        Ok(ScoringResult {
            prediction,
            probability,
            feature_contributions: feature_contributions(input),
        })
    }
}

impl<R: Rng + Send> Predictor for MockRiskScorer<R> {
    fn predict(&mut self, input: &TransactionInput) -> Result<ScoringResult, ScoreError> {
        self.score(input)
    }

    fn name(&self) -> &str {
        "mock-threshold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(amount: f64, time: f64, pca: [f64; 4]) -> TransactionInput {
        TransactionInput::new(amount, time, pca)
    }

    fn values(result: &ScoringResult) -> Vec<f64> {
        result.feature_contributions.iter().map(|c| c.contribution).collect()
    }

    #[test]
    fn test_branch_selection() {
        assert_eq!(RiskBranch::for_input(&input(1500.0, 0.0, [-4.0; 4])), RiskBranch::HighAmount);
        assert_eq!(RiskBranch::for_input(&input(1000.0, 0.0, [-3.5, 0.0, 0.0, 0.0])), RiskBranch::PcaOutlier);
        assert_eq!(RiskBranch::for_input(&input(10.0, 0.0, [0.0, -3.01, 0.0, 0.0])), RiskBranch::PcaOutlier);
        // -3 itself is not an outlier
        assert_eq!(RiskBranch::for_input(&input(10.0, 0.0, [-3.0, -3.0, 0.0, 0.0])), RiskBranch::Baseline);
    }

    #[test]
    fn test_contributions_fixed_order() {
        let mut scorer = MockRiskScorer::seeded(7);
        let result = scorer.score(&input(20.0, 100.0, [1.0; 4])).unwrap();
        let order: Vec<Feature> = result.feature_contributions.iter().map(|c| c.feature).collect();
        assert_eq!(order, Feature::ALL.to_vec());
        assert_eq!(values(&result), vec![-0.30, -0.10, -0.20, -0.25, -0.15, -0.30]);
    }

    #[test]
    fn test_amount_boundary_is_exclusive() {
        let at = feature_contributions(&input(500.0, 0.0, [0.0; 4]));
        let above = feature_contributions(&input(501.0, 0.0, [0.0; 4]));
        assert_eq!(at[0].contribution, -0.30);
        assert_eq!(above[0].contribution, 0.40);
    }

    #[test]
    fn test_zero_pca_counts_as_non_negative() {
        let c = feature_contributions(&input(0.0, 10_000.0, [0.0; 4]));
        assert_eq!(c[1].contribution, -0.10);
        assert_eq!(c[2].contribution, -0.20);
        assert_eq!(c[5].contribution, -0.30);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut scorer = MockRiskScorer::seeded(1);
        let err = scorer.score(&input(-5.0, 0.0, [0.0; 4])).unwrap_err();
        assert_eq!(err, ScoreError::InvalidInput { field: "amount", value: -5.0 });
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut scorer = MockRiskScorer::seeded(1);
        let err = scorer.score(&input(5.0, f64::INFINITY, [0.0; 4])).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidInput { field: "time", .. }));
        let err = scorer.score(&input(5.0, -1.0, [0.0; 4])).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidInput { field: "time", .. }));
        assert!(scorer.score(&input(f64::NAN, 0.0, [0.0; 4])).is_err());
    }

    #[test]
    fn test_same_seed_same_results() {
        let tx = input(750.0, 4000.0, [-1.0, 2.0, -0.5, 0.3]);
        let mut a = MockRiskScorer::seeded(99);
        let mut b = MockRiskScorer::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.score(&tx).unwrap(), b.score(&tx).unwrap());
        }
    }

    #[test]
    fn test_confidence_ranges_by_verdict() {
        let mut scorer = MockRiskScorer::seeded(2024);
        let tx = input(2000.0, 0.0, [0.0; 4]);
        for _ in 0..2000 {
            let r = scorer.score(&tx).unwrap();
            assert!(r.probability >= CONFIDENCE_FLOOR);
            match r.prediction {
                Prediction::Fraud => assert!(r.probability <= FRAUD_CONFIDENCE_CEIL),
                Prediction::Legitimate => assert!(r.probability <= LEGIT_CONFIDENCE_CEIL),
            }
        }
    }

    #[test]
    fn test_boxed_predictor_delegates() {
        let mut boxed: Box<dyn Predictor> = Box::new(MockRiskScorer::seeded(3));
        assert_eq!(boxed.name(), "mock-threshold");
        let r = boxed.predict(&input(1.0, 1.0, [0.0; 4])).unwrap();
        assert_eq!(r.feature_contributions.len(), 6);
    }
}
