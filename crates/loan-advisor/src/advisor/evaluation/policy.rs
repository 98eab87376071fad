use serde::{Deserialize, Serialize};

/// Why a lender would turn the applicant down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityReason {
    CreditScoreBelowMinimum {
        credit_score: u16,
        required: u16,
    },
    TenureExceedsMaximum {
        requested_years: f64,
        max_years: u32,
    },
    Unaffordable {
        estimated_emi: f64,
        allowed_emi: f64,
        affordability_ratio: f64,
    },
    InstallmentUnavailable,
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::CreditScoreBelowMinimum {
                credit_score,
                required,
            } => format!(
                "Credit score {credit_score} is below the required minimum of {required} (short by {}).",
                required.saturating_sub(*credit_score)
            ),
            IneligibilityReason::TenureExceedsMaximum {
                requested_years,
                max_years,
            } => format!(
                "Requested tenure ({}y) exceeds the lender's maximum tenure ({max_years}y).",
                format_years(*requested_years)
            ),
            IneligibilityReason::Unaffordable {
                estimated_emi,
                allowed_emi,
                affordability_ratio,
            } => format!(
                "Estimated EMI ₹{:.0} exceeds {:.0}% of your net income after existing EMIs (₹{:.0}).",
                estimated_emi,
                affordability_ratio * 100.0,
                allowed_emi
            ),
            IneligibilityReason::InstallmentUnavailable => {
                "The monthly installment could not be estimated for this offer.".to_string()
            }
        }
    }
}

fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        format!("{years:.1}")
    }
}
