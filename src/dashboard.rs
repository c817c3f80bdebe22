//! Demo figures behind the overview dashboard and the data-analysis page.
//!
//! All numbers are hard-coded showcase values, not measurements of the
//! scorer in this crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub auc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub name: String,
    pub value: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ConfusionMatrix {
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    pub fn metrics(&self) -> ConfusionMetrics {
        ConfusionMetrics {
            accuracy: self.accuracy(),
            precision: self.precision(),
            recall: self.recall(),
            f1: self.f1(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub day: String,
    pub legitimate: u64,
    pub fraud: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub value: f64,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub description: String,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: Vec<StatCard>,
    pub model_performance: Vec<ModelPerformance>,
    pub distribution: Vec<ClassShare>,
    pub confusion_matrix: ConfusionMatrix,
    pub confusion_metrics: ConfusionMetrics,
    pub weekly_trends: Vec<DailyVolume>,
    pub feature_importance: Vec<FeatureImportance>,
}

// =============================================================================
// Demo data
// =============================================================================

const MODELS: [(&str, f64, f64, f64, f64); 3] = [
    ("Logistic Reg.", 0.85, 0.75, 0.80, 0.82),
    ("Random Forest", 0.92, 0.83, 0.87, 0.94),
    ("XGBoost", 0.94, 0.85, 0.89, 0.96),
];

pub const LEGITIMATE_COUNT: u64 = 284_315;
pub const FRAUD_COUNT: u64 = 492;

const WEEK: [(&str, u64, u64); 7] = [
    ("Mon", 42_800, 75),
    ("Tue", 39_500, 68),
    ("Wed", 44_200, 82),
    ("Thu", 46_100, 74),
    ("Fri", 50_300, 91),
    ("Sat", 36_900, 53),
    ("Sun", 24_500, 49),
];

const IMPORTANCE: [(&str, f64); 13] = [
    ("V17", 0.92),
    ("V14", 0.87),
    ("V12", 0.85),
    ("V10", 0.82),
    ("V16", 0.78),
    ("V4", 0.76),
    ("V11", 0.71),
    ("Amount", 0.67),
    ("V3", 0.65),
    ("V7", 0.62),
    ("V1", 0.57),
    ("V2", 0.54),
    ("Time", 0.48),
];

const BEST_F1_TREND_PCT: f64 = 5.2;

pub fn model_performance() -> Vec<ModelPerformance> {
    MODELS
        .iter()
        .map(|&(name, precision, recall, f1_score, auc)| ModelPerformance {
            name: name.to_string(),
            precision,
            recall,
            f1_score,
            auc,
        })
        .collect()
}

pub fn best_model(models: &[ModelPerformance]) -> Option<&ModelPerformance> {
    models.iter().max_by(|a, b| a.f1_score.total_cmp(&b.f1_score))
}

pub fn fraud_distribution() -> Vec<ClassShare> {
    let total = LEGITIMATE_COUNT + FRAUD_COUNT;
    [("Legitimate", LEGITIMATE_COUNT), ("Fraudulent", FRAUD_COUNT)]
        .iter()
        .map(|&(name, value)| ClassShare {
            name: name.to_string(),
            value,
            percent: ratio(value, total) * 100.0,
        })
        .collect()
}

pub fn confusion_matrix() -> ConfusionMatrix {
    ConfusionMatrix {
        true_positives: 420,
        false_positives: 72,
        false_negatives: 27,
        true_negatives: 56_936,
    }
}

pub fn weekly_trends() -> Vec<DailyVolume> {
    WEEK.iter()
        .map(|&(day, legitimate, fraud)| DailyVolume {
            day: day.to_string(),
            legitimate,
            fraud,
        })
        .collect()
}

/// Feature importance, highest first.
pub fn feature_importance() -> Vec<FeatureImportance> {
    let mut features: Vec<FeatureImportance> = IMPORTANCE
        .iter()
        .map(|&(name, importance)| FeatureImportance {
            name: name.to_string(),
            importance,
        })
        .collect();
    features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    features
}

pub fn stat_cards(models: &[ModelPerformance]) -> Vec<StatCard> {
    let total = LEGITIMATE_COUNT + FRAUD_COUNT;
    let mut cards = vec![
        StatCard {
            title: "Total Transactions".to_string(),
            value: total.to_string(),
            description: "Total number of processed transactions".to_string(),
            trend: None,
        },
        StatCard {
            title: "Fraud Detected".to_string(),
            value: FRAUD_COUNT.to_string(),
            description: "Fraudulent transactions identified".to_string(),
            trend: None,
        },
        StatCard {
            title: "Fraud Rate".to_string(),
            value: format!("{:.2}%", ratio(FRAUD_COUNT, total) * 100.0),
            description: "Percentage of fraudulent transactions".to_string(),
            trend: None,
        },
    ];
    if let Some(best) = best_model(models) {
        cards.push(StatCard {
            title: "Best Model F1".to_string(),
            value: format!("{:.2}", best.f1_score),
            description: format!("{} model performance", best.name),
            trend: Some(Trend {
                value: BEST_F1_TREND_PCT,
                is_positive: true,
            }),
        });
    }
    cards
}

impl DashboardSnapshot {
    pub fn demo() -> Self {
        let models = model_performance();
        let matrix = confusion_matrix();
        Self {
            stats: stat_cards(&models),
            model_performance: models,
            distribution: fraud_distribution(),
            confusion_matrix: matrix,
            confusion_metrics: matrix.metrics(),
            weekly_trends: weekly_trends(),
            feature_importance: feature_importance(),
        }
    }
}
