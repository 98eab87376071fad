use std::sync::Arc;

use super::catalog::{LenderCatalog, LoanTypeId};
use super::classifier::{Classification, ClassificationResult, IntentId, CLARIFICATION_TEXT};
use super::comparison::default_comparison;
use super::domain::EligibilityApplication;
use super::evaluation::EligibilityVerdict;
use super::generator::GeneratedReply;
use super::interview::{InterviewField, ValidationError};
use super::response::{
    InterviewProgress, ResponseCategory, ResponseEnvelope, ResponsePayload,
};

pub const CANCELLED_TEXT: &str =
    "Eligibility check cancelled. Ask me anything else whenever you're ready.";

/// Builds the envelope for each kind of turn outcome.
#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    catalog: Arc<LenderCatalog>,
}

impl ResponseAssembler {
    pub fn new(catalog: Arc<LenderCatalog>) -> Self {
        Self { catalog }
    }

    /// Envelope for a classifier result that does not start an interview.
    pub fn classified(&self, result: ClassificationResult) -> ResponseEnvelope {
        let category = match result.category {
            Classification::Scenario(_) | Classification::Intent(IntentId::LoanTypeInquiry) => {
                ResponseCategory::ScenarioCard
            }
            Classification::Intent(IntentId::Greeting) => ResponseCategory::Welcome,
            Classification::Intent(IntentId::Comparison) => ResponseCategory::ComparisonCard,
            Classification::Intent(IntentId::Eligibility) => ResponseCategory::EligibilityStart,
            Classification::Intent(_) | Classification::Unclassified => ResponseCategory::Text,
        };

        let payload = match category {
            ResponseCategory::ComparisonCard => {
                Some(ResponsePayload::Comparison(default_comparison(&self.catalog)))
            }
            _ => result.loan_type.map(|loan_type| ResponsePayload::LoanType {
                loan_type,
                lender_id: result.lender_id.clone(),
            }),
        };

        ResponseEnvelope {
            display_text: result.text,
            category,
            title: result.title,
            payload,
        }
    }

    /// First question of a new interview, prefixed with the introduction.
    pub fn interview_started(&self, intro: &str) -> ResponseEnvelope {
        let field = InterviewField::ORDER[0];
        ResponseEnvelope {
            display_text: format!("{intro}\n\n{}", field.question()),
            category: ResponseCategory::EligibilityStart,
            title: None,
            payload: Some(progress(field, 0, None)),
        }
    }

    /// Next or repeated question. The display text is the question alone.
    pub fn interview_question(
        &self,
        field: InterviewField,
        step_index: usize,
        retry: Option<&ValidationError>,
    ) -> ResponseEnvelope {
        ResponseEnvelope {
            display_text: field.question().to_string(),
            category: ResponseCategory::EligibilityQuestion,
            title: None,
            payload: Some(progress(field, step_index, retry)),
        }
    }

    pub fn interview_cancelled(&self) -> ResponseEnvelope {
        ResponseEnvelope::text(CANCELLED_TEXT)
    }

    pub fn eligibility_result(
        &self,
        application: EligibilityApplication,
        verdicts: Vec<EligibilityVerdict>,
    ) -> ResponseEnvelope {
        let label = application.loan_type.label();
        let display_text = if verdicts.is_empty() {
            format!("None of our partner lenders currently offer a {label}.")
        } else {
            let eligible = verdicts.iter().filter(|verdict| verdict.eligible).count();
            let mut lines = vec![format!(
                "Results for a {label} of ₹{:.0} over {} years: eligible with {eligible} of {} lenders.",
                application.amount,
                application.tenure_years,
                verdicts.len()
            )];
            lines.extend(verdicts.iter().map(|verdict| format!("- {}", verdict.summary())));
            lines.join("\n")
        };

        ResponseEnvelope {
            display_text,
            category: ResponseCategory::EligibilityResult,
            title: Some(format!("{label} Eligibility")),
            payload: Some(ResponsePayload::Verdicts {
                application,
                verdicts,
            }),
        }
    }

    /// Envelope for a generator reply that does not start an interview.
    pub fn generated(&self, reply: GeneratedReply) -> ResponseEnvelope {
        let category = ResponseCategory::from_generator_label(&reply.category);
        let payload = match category {
            ResponseCategory::ComparisonCard => {
                Some(ResponsePayload::Comparison(default_comparison(&self.catalog)))
            }
            ResponseCategory::ScenarioCard => reply.payload.map(|value| {
                match value.as_str().and_then(LoanTypeId::parse) {
                    Some(loan_type) => ResponsePayload::LoanType {
                        loan_type,
                        lender_id: None,
                    },
                    None => ResponsePayload::External(value),
                }
            }),
            _ => reply.payload.map(ResponsePayload::External),
        };

        ResponseEnvelope {
            display_text: reply.text,
            category,
            title: reply.title,
            payload,
        }
    }

    pub fn fallback(&self) -> ResponseEnvelope {
        ResponseEnvelope::text(CLARIFICATION_TEXT)
    }
}

fn progress(
    field: InterviewField,
    step_index: usize,
    retry: Option<&ValidationError>,
) -> ResponsePayload {
    ResponsePayload::Interview(InterviewProgress {
        step_index,
        total_steps: InterviewField::ORDER.len(),
        field,
        retry: retry.is_some(),
        hint: retry.map(|err| err.to_string()),
    })
}
