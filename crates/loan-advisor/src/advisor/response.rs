use serde::{Deserialize, Serialize};

use super::catalog::LoanTypeId;
use super::comparison::LenderComparison;
use super::domain::EligibilityApplication;
use super::evaluation::EligibilityVerdict;
use super::interview::InterviewField;

/// Rendering hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    Welcome,
    Text,
    ScenarioCard,
    ComparisonCard,
    EligibilityStart,
    EligibilityQuestion,
    EligibilityResult,
}

impl ResponseCategory {
    /// Maps a text generator's category label; unknown labels render as plain text.
    pub fn from_generator_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "welcome" => ResponseCategory::Welcome,
            "loan_card" | "scenario_card" => ResponseCategory::ScenarioCard,
            "comparison_card" => ResponseCategory::ComparisonCard,
            "start_eligibility" | "eligibility_start" => ResponseCategory::EligibilityStart,
            _ => ResponseCategory::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewProgress {
    pub step_index: usize,
    pub total_steps: usize,
    pub field: InterviewField,
    pub retry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ResponsePayload {
    LoanType {
        loan_type: LoanTypeId,
        #[serde(skip_serializing_if = "Option::is_none")]
        lender_id: Option<String>,
    },
    Verdicts {
        application: EligibilityApplication,
        verdicts: Vec<EligibilityVerdict>,
    },
    Comparison(LenderComparison),
    Interview(InterviewProgress),
    External(serde_json::Value),
}

/// Everything the presentation layer receives for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub display_text: String,
    pub category: ResponseCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponsePayload>,
}

impl ResponseEnvelope {
    pub fn text(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            category: ResponseCategory::Text,
            title: None,
            payload: None,
        }
    }

    pub fn verdicts(&self) -> Option<&[EligibilityVerdict]> {
        match &self.payload {
            Some(ResponsePayload::Verdicts { verdicts, .. }) => Some(verdicts),
            _ => None,
        }
    }
}
