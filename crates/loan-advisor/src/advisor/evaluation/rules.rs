use tracing::warn;

use super::super::calculator::compute_emi;
use super::super::catalog::LenderLoanOffer;
use super::super::domain::EligibilityApplication;
use super::config::EvaluationConfig;
use super::policy::IneligibilityReason;

pub(crate) struct OfferAssessment {
    pub violations: Vec<IneligibilityReason>,
    pub emi: Option<f64>,
}

/// Credit, tenure and affordability checks, in that order.
pub(crate) fn assess_offer(
    application: &EligibilityApplication,
    offer: &LenderLoanOffer,
    config: &EvaluationConfig,
) -> OfferAssessment {
    let mut violations = Vec::new();

    if offer.min_credit_score > 0 && application.credit_score < offer.min_credit_score {
        violations.push(IneligibilityReason::CreditScoreBelowMinimum {
            credit_score: application.credit_score,
            required: offer.min_credit_score,
        });
    }

    if application.tenure_years > offer.max_tenure_years as f64 {
        violations.push(IneligibilityReason::TenureExceedsMaximum {
            requested_years: application.tenure_years,
            max_years: offer.max_tenure_years,
        });
    }

    let emi = match compute_emi(
        application.amount,
        offer.annual_rate_percent,
        application.tenure_months(),
    ) {
        Ok(emi) => Some(emi),
        Err(err) => {
            warn!(error = %err, loan_type = ?offer.loan_type, "installment estimate failed");
            None
        }
    };

    match emi {
        Some(emi) => {
            let net_available = (application.monthly_income - application.existing_emi).max(0.0);
            let allowed = net_available * config.affordability_ratio;
            if emi > allowed {
                violations.push(IneligibilityReason::Unaffordable {
                    estimated_emi: emi,
                    allowed_emi: allowed,
                    affordability_ratio: config.affordability_ratio,
                });
            }
        }
        None => violations.push(IneligibilityReason::InstallmentUnavailable),
    }

    OfferAssessment { violations, emi }
}
