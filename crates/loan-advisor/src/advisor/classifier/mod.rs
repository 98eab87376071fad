//! Deterministic free-text classifier.
//!
//! Decision order: scenarios, then a lender plus loan type, then a bare loan type, then the
//! greeting, eligibility, comparison and rate/EMI intents. Anything else is unclassified.

mod intents;
mod scenarios;

pub use intents::IntentId;
pub use scenarios::ScenarioId;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{LenderCatalog, LoanTypeId};

pub const WELCOME_TEXT: &str = "Hello! I am your Banking Advisor. I can assist you with Home \
    Loans, Education Loans, Personal Loans, and documentation requirements. How may I assist you \
    today?";
pub const WELCOME_TIP: &str =
    "Tip: say \"am I eligible\" to run a quick eligibility check across our lenders.";
pub const ELIGIBILITY_START_TEXT: &str = "Let's check your eligibility. I'll ask a few quick \
    questions; type \"cancel\" at any time to stop.";
pub const COMPARISON_TEXT: &str =
    "Here is a snapshot of home loan rates across our partner lenders, cheapest first.";
pub const GENERAL_RATES_TEXT: &str = "Interest rates depend on the loan type, your credit score \
    and the tenure. Home and education loans are the cheapest at roughly 6.5% to 7.5% a year, \
    while personal and business loans run from about 10.5% to 12%. Ask about a specific lender \
    and loan type for its exact rate.";
pub const EMI_TEXT: &str = "Your EMI is the fixed monthly payment that repays the loan with \
    interest over the tenure. A longer tenure lowers the EMI but raises the total interest paid. \
    Lenders generally expect all EMIs together to stay under half of your take-home income.";
pub const CLARIFICATION_TEXT: &str = "I'm not sure I understood. You can ask me about loan \
    types, interest rates or lender comparisons, or say \"am I eligible\" to run an eligibility \
    check.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Classification {
    Scenario(ScenarioId),
    Intent(IntentId),
    Unclassified,
}

/// Outcome for one utterance. Built and consumed within a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Classification,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<LoanTypeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lender_id: Option<String>,
}

impl ClassificationResult {
    fn intent(intent: IntentId, text: impl Into<String>) -> Self {
        Self {
            category: Classification::Intent(intent),
            text: text.into(),
            title: None,
            loan_type: None,
            lender_id: None,
        }
    }
}

/// Stateless classifier over a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: Arc<LenderCatalog>,
}

impl Classifier {
    pub fn new(catalog: Arc<LenderCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = text.trim().to_lowercase();

        if let Some(rule) = scenarios::detect(&normalized) {
            return ClassificationResult {
                category: Classification::Scenario(rule.id),
                text: rule.response.to_string(),
                title: Some(rule.title.to_string()),
                loan_type: Some(rule.loan_type),
                lender_id: None,
            };
        }

        let loan_type = intents::mentioned_loan_type(&normalized);

        if let (Some(lender), Some(loan_type)) =
            (self.catalog.mentioned_lender(&normalized), loan_type)
        {
            let text = match lender.offer(loan_type) {
                Some(offer) => format!(
                    "{} offers its {} at {}% per year, for up to {} years.",
                    lender.name,
                    loan_type.label(),
                    offer.annual_rate_percent,
                    offer.max_tenure_years
                ),
                None => format!(
                    "{} does not offer a {}. Ask me to compare lenders to see who does.",
                    lender.name,
                    loan_type.label()
                ),
            };
            return ClassificationResult {
                loan_type: Some(loan_type),
                lender_id: Some(lender.id.clone()),
                ..ClassificationResult::intent(IntentId::LenderRate, text)
            };
        }

        if let Some(loan_type) = loan_type {
            let text = format!(
                "A **{}** could suit you. Ask me to compare lenders, or say \"am I eligible\" to \
                 check your eligibility.",
                loan_type.label()
            );
            return ClassificationResult {
                title: Some(loan_type.label().to_string()),
                loan_type: Some(loan_type),
                ..ClassificationResult::intent(IntentId::LoanTypeInquiry, text)
            };
        }

        match intents::detect(&normalized) {
            Some(IntentId::Greeting) => ClassificationResult {
                title: Some("Welcome".to_string()),
                ..ClassificationResult::intent(
                    IntentId::Greeting,
                    format!("{WELCOME_TEXT}\n\n{WELCOME_TIP}"),
                )
            },
            Some(IntentId::Eligibility) => {
                ClassificationResult::intent(IntentId::Eligibility, ELIGIBILITY_START_TEXT)
            }
            Some(IntentId::Comparison) => ClassificationResult {
                loan_type: Some(LoanTypeId::Home),
                ..ClassificationResult::intent(IntentId::Comparison, COMPARISON_TEXT)
            },
            Some(IntentId::EmiInquiry) => {
                ClassificationResult::intent(IntentId::EmiInquiry, EMI_TEXT)
            }
            Some(intent) => ClassificationResult::intent(intent, GENERAL_RATES_TEXT),
            None => ClassificationResult {
                category: Classification::Unclassified,
                text: CLARIFICATION_TEXT.to_string(),
                title: None,
                loan_type: None,
                lender_id: None,
            },
        }
    }
}
