use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::catalog::LoanTypeId;
use super::super::domain::{EligibilityApplication, EmploymentType};
use super::super::evaluation::EvaluationConfig;
use super::InterviewError;

/// Interview questions in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewField {
    #[serde(rename = "loanType")]
    LoanType,
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "tenure")]
    Tenure,
    #[serde(rename = "monthlyIncome")]
    MonthlyIncome,
    #[serde(rename = "creditScore")]
    CreditScore,
    #[serde(rename = "existingEMI")]
    ExistingEmi,
    #[serde(rename = "employmentType")]
    EmploymentType,
}

impl InterviewField {
    pub const ORDER: [InterviewField; 7] = [
        InterviewField::LoanType,
        InterviewField::Amount,
        InterviewField::Tenure,
        InterviewField::MonthlyIncome,
        InterviewField::CreditScore,
        InterviewField::ExistingEmi,
        InterviewField::EmploymentType,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            InterviewField::LoanType => "loanType",
            InterviewField::Amount => "amount",
            InterviewField::Tenure => "tenure",
            InterviewField::MonthlyIncome => "monthlyIncome",
            InterviewField::CreditScore => "creditScore",
            InterviewField::ExistingEmi => "existingEMI",
            InterviewField::EmploymentType => "employmentType",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            InterviewField::LoanType => {
                "Which loan type? (home, auto, personal, education, business, gadget)"
            }
            InterviewField::Amount => "What loan amount do you need? (in ₹)",
            InterviewField::Tenure => "Preferred tenure (years)?",
            InterviewField::MonthlyIncome => "Your monthly income (in ₹)?",
            InterviewField::CreditScore => "Approx. your credit score (e.g., 600, 700)?",
            InterviewField::ExistingEmi => {
                "Existing monthly EMI/outgoings (in ₹). If none, type 0."
            }
            InterviewField::EmploymentType => {
                "Employment type: salaried / self-employed / student / other"
            }
        }
    }
}

/// An answer that failed its rule; the same question is asked again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("please answer with one of: home, auto, personal, education, business, gadget")]
    UnknownLoanType,
    #[error("please answer with a number")]
    NotANumber,
    #[error("the value must be greater than zero")]
    NotPositive,
    #[error("the value must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
    #[error("please answer with a whole number")]
    NotWhole,
    #[error("please answer salaried, self-employed, student or other")]
    UnknownEmploymentType,
}

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"));

/// First number in the answer once thousands separators are dropped. `None` when there is none.
///
/// Currency prefixes and words around the number are ignored, so "₹15,00,000" reads as
/// 1500000 and "Rs. 45,000" as 45000.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    NUMBER_PATTERN
        .find(&cleaned)
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Validated value for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    LoanType(LoanTypeId),
    Employment(EmploymentType),
    Number(f64),
}

pub(crate) fn validate(
    field: InterviewField,
    text: &str,
    config: &EvaluationConfig,
) -> Result<AnswerValue, ValidationError> {
    match field {
        InterviewField::LoanType => LoanTypeId::find_in(text)
            .map(AnswerValue::LoanType)
            .ok_or(ValidationError::UnknownLoanType),
        InterviewField::Amount | InterviewField::MonthlyIncome => {
            let value = parse_number(text).ok_or(ValidationError::NotANumber)?;
            if value > 0.0 {
                Ok(AnswerValue::Number(value))
            } else {
                Err(ValidationError::NotPositive)
            }
        }
        InterviewField::Tenure => {
            let value = parse_number(text).ok_or(ValidationError::NotANumber)?;
            // at least one whole month once converted
            if value * 12.0 < 0.5 {
                return Err(ValidationError::NotPositive);
            }
            if value > config.max_tenure_years {
                return Err(ValidationError::OutOfRange {
                    min: 0.0,
                    max: config.max_tenure_years,
                });
            }
            Ok(AnswerValue::Number(value))
        }
        InterviewField::CreditScore => {
            let value = parse_number(text).ok_or(ValidationError::NotANumber)?;
            if value.fract() != 0.0 {
                return Err(ValidationError::NotWhole);
            }
            let (min, max) = (config.min_credit_score, config.max_credit_score);
            if value < min as f64 || value > max as f64 {
                return Err(ValidationError::OutOfRange {
                    min: min as f64,
                    max: max as f64,
                });
            }
            Ok(AnswerValue::Number(value))
        }
        // the number pattern carries no sign, so any value here is >= 0
        InterviewField::ExistingEmi => parse_number(text)
            .map(AnswerValue::Number)
            .ok_or(ValidationError::NotANumber),
        InterviewField::EmploymentType => EmploymentType::find_in(text)
            .map(AnswerValue::Employment)
            .ok_or(ValidationError::UnknownEmploymentType),
    }
}

/// Partially collected interview facts; a field is set only once its answer validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<LoanTypeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u16>,
    #[serde(rename = "existingEMI", skip_serializing_if = "Option::is_none")]
    pub existing_emi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
}

impl InterviewAnswers {
    /// Store an accepted answer. A value of the wrong kind for `field` is refused untouched.
    pub(crate) fn record(
        &mut self,
        field: InterviewField,
        value: AnswerValue,
    ) -> Result<(), InterviewError> {
        match (field, value) {
            (InterviewField::LoanType, AnswerValue::LoanType(kind)) => self.loan_type = Some(kind),
            (InterviewField::Amount, AnswerValue::Number(v)) => self.amount = Some(v),
            (InterviewField::Tenure, AnswerValue::Number(v)) => self.tenure = Some(v),
            (InterviewField::MonthlyIncome, AnswerValue::Number(v)) => {
                self.monthly_income = Some(v)
            }
            (InterviewField::CreditScore, AnswerValue::Number(v)) => {
                self.credit_score = Some(v as u16)
            }
            (InterviewField::ExistingEmi, AnswerValue::Number(v)) => self.existing_emi = Some(v),
            (InterviewField::EmploymentType, AnswerValue::Employment(kind)) => {
                self.employment_type = Some(kind)
            }
            _ => return Err(InterviewError::MismatchedAnswer(field)),
        }
        Ok(())
    }

    pub fn contains(&self, field: InterviewField) -> bool {
        match field {
            InterviewField::LoanType => self.loan_type.is_some(),
            InterviewField::Amount => self.amount.is_some(),
            InterviewField::Tenure => self.tenure.is_some(),
            InterviewField::MonthlyIncome => self.monthly_income.is_some(),
            InterviewField::CreditScore => self.credit_score.is_some(),
            InterviewField::ExistingEmi => self.existing_emi.is_some(),
            InterviewField::EmploymentType => self.employment_type.is_some(),
        }
    }

    /// The full application once every question has an accepted answer.
    pub fn complete(&self) -> Option<EligibilityApplication> {
        Some(EligibilityApplication {
            loan_type: self.loan_type?,
            amount: self.amount?,
            tenure_years: self.tenure?,
            monthly_income: self.monthly_income?,
            credit_score: self.credit_score?,
            existing_emi: self.existing_emi?,
            employment_type: self.employment_type?,
        })
    }
}
