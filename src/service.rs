//! Request/response wrapper around a predictor.

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

use crate::config::Config;
use crate::error::{AnalysisError, ScoreError};
use crate::logging::{self, v_str, ProfileScope};
use crate::predictor::{Predictor, ScoringResult};
use crate::risk::RiskAssessment;
use crate::scorer::{MockRiskScorer, RiskBranch};
use crate::transaction::{TransactionForm, TransactionInput};

/// What the detection page renders after a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub model: String,
    pub input: TransactionInput,
    pub result: ScoringResult,
    pub risk: RiskAssessment,
}

pub struct AnalysisService {
    predictor: Box<dyn Predictor>,
    delay: Duration,
}

impl AnalysisService {
    pub fn new(predictor: Box<dyn Predictor>, delay: Duration) -> Self {
        Self { predictor, delay }
    }

    /// Mock scorer, seeded when the config pins a seed.
    pub fn from_config(cfg: &Config) -> Self {
        let scorer = match cfg.seed {
            Some(seed) => MockRiskScorer::seeded(seed),
            None => MockRiskScorer::from_entropy(),
        };
        Self::new(Box::new(scorer), Duration::from_millis(cfg.analysis_delay_ms))
    }

    pub fn model_name(&self) -> &str {
        self.predictor.name()
    }

    pub async fn analyze(&mut self, input: &TransactionInput) -> Result<Analysis, ScoreError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let model = self.predictor.name().to_string();
        let result = {
            let _scope = ProfileScope::with_context("predict", &[("model", v_str(&model))]);
            self.predictor.predict(input)
        };
        let result = match result {
            Ok(r) => r,
            Err(err) => {
                logging::log_rejected_input(&model, &err.to_string());
                return Err(err);
            }
        };

        logging::log_prediction(&model, RiskBranch::for_input(input), &result);
        let risk = RiskAssessment::from_result(&result);
        logging::log_risk_assessment(&risk);

        Ok(Analysis {
            model,
            input: *input,
            result,
            risk,
        })
    }

    pub async fn analyze_form(&mut self, form: &TransactionForm) -> Result<Analysis, AnalysisError> {
        let input = form.parse()?;
        Ok(self.analyze(&input).await?)
    }
}
