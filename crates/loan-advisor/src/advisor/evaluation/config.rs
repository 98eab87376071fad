use serde::{Deserialize, Serialize};

/// Eligibility policy thresholds shared by the interview and the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Share of income left after existing obligations that a new installment may consume.
    pub affordability_ratio: f64,
    pub max_tenure_years: f64,
    pub min_credit_score: u16,
    pub max_credit_score: u16,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            affordability_ratio: 0.5,
            max_tenure_years: 30.0,
            min_credit_score: 300,
            max_credit_score: 900,
        }
    }
}
