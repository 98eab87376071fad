use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::LoanTypeId;

/// Identifier scoping interview state to one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment categories accepted by the eligibility interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Student,
    Other,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::Salaried,
        EmploymentType::SelfEmployed,
        EmploymentType::Student,
        EmploymentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Salaried => "salaried",
            EmploymentType::SelfEmployed => "self-employed",
            EmploymentType::Student => "student",
            EmploymentType::Other => "other",
        }
    }

    /// Finds the first category mentioned anywhere in free text.
    pub fn find_in(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        if lowered.contains("self-employed") || lowered.contains("self employed") {
            return Some(EmploymentType::SelfEmployed);
        }
        Self::ALL
            .into_iter()
            .filter(|kind| *kind != EmploymentType::SelfEmployed)
            .find(|kind| lowered.contains(kind.as_str()))
    }
}

/// Completed interview facts handed to the eligibility evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityApplication {
    pub loan_type: LoanTypeId,
    pub amount: f64,
    pub tenure_years: f64,
    pub monthly_income: f64,
    pub credit_score: u16,
    #[serde(rename = "existingEMI")]
    pub existing_emi: f64,
    pub employment_type: EmploymentType,
}

impl EligibilityApplication {
    /// Tenure converted to whole months for the installment formula.
    pub fn tenure_months(&self) -> u32 {
        (self.tenure_years * 12.0).round().max(0.0) as u32
    }
}
