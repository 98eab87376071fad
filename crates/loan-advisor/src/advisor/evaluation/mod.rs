mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;
pub use policy::IneligibilityReason;

use serde::{Deserialize, Serialize};

use super::calculator::round_currency;
use super::catalog::LenderCatalog;
use super::domain::EligibilityApplication;
use rules::assess_offer;

/// Stateless evaluator applying the eligibility policy to every lender offering the product.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    config: EvaluationConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// One verdict per lender offering the requested loan type, in catalog order.
    ///
    /// Lenders without such an offer are left out rather than reported as ineligible.
    pub fn evaluate(
        &self,
        application: &EligibilityApplication,
        catalog: &LenderCatalog,
    ) -> Vec<EligibilityVerdict> {
        catalog
            .offers_for(application.loan_type)
            .map(|(lender, offer)| {
                let assessment = assess_offer(application, offer, &self.config);
                let reasons = assessment
                    .violations
                    .iter()
                    .map(IneligibilityReason::summary)
                    .collect();

                EligibilityVerdict {
                    lender_id: lender.id.clone(),
                    lender_name: lender.name.clone(),
                    eligible: assessment.violations.is_empty(),
                    reasons,
                    violations: assessment.violations,
                    estimated_monthly_installment: assessment.emi.map(round_currency),
                    offered_rate_percent: offer.annual_rate_percent,
                }
            })
            .collect()
    }
}

/// Per-lender outcome. The installment is reported even when ineligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityVerdict {
    pub lender_id: String,
    pub lender_name: String,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub violations: Vec<IneligibilityReason>,
    pub estimated_monthly_installment: Option<f64>,
    pub offered_rate_percent: f64,
}

impl EligibilityVerdict {
    pub fn summary(&self) -> String {
        let installment = self
            .estimated_monthly_installment
            .map(|emi| format!("₹{emi:.0}/month"))
            .unwrap_or_else(|| "installment unavailable".to_string());

        if self.eligible {
            format!(
                "{}: eligible at {}% ({installment})",
                self.lender_name, self.offered_rate_percent
            )
        } else {
            format!(
                "{}: not eligible at {}% ({installment}); {}",
                self.lender_name,
                self.offered_rate_percent,
                self.reasons.join(" ")
            )
        }
    }
}
