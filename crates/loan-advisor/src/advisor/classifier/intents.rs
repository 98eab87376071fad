use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::catalog::LoanTypeId;

/// General conversational purposes, independent of any scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentId {
    Greeting,
    Eligibility,
    Comparison,
    RateInquiry,
    EmiInquiry,
    /// A named lender and loan type: answered from that lender's offer.
    LenderRate,
    /// A loan type with no lender: generic recommendation.
    LoanTypeInquiry,
}

/// Pattern-driven intents, in decision order.
pub(crate) static INTENT_RULES: Lazy<Vec<(IntentId, Regex)>> = Lazy::new(|| {
    [
        (
            IntentId::Greeting,
            r"^\W*(hi|hii+|hello|hey|namaste|greetings|good (morning|afternoon|evening))\b",
        ),
        (
            IntentId::Eligibility,
            r"\b(eligible|eligibility|qualify|qualified|can i get|am i able to get)\b",
        ),
        (
            IntentId::Comparison,
            r"\b(compare|comparing|comparison|versus|vs|side by side|which (bank|lender) is (better|best|cheapest))\b",
        ),
        (
            IntentId::RateInquiry,
            r"\b(interest rates?|rates?|roi|apr)\b",
        ),
        (
            IntentId::EmiInquiry,
            r"\b(emis?|installments?|instalments?|monthly payments?|repayments?)\b",
        ),
    ]
    .into_iter()
    .map(|(intent, pattern)| (intent, Regex::new(pattern).expect("valid intent pattern")))
    .collect()
});

static LOAN_TYPE_PATTERNS: Lazy<Vec<(LoanTypeId, Regex)>> = Lazy::new(|| {
    LoanTypeId::ALL
        .into_iter()
        .map(|kind| {
            let mut terms = vec![kind.as_str().to_string(), kind.label().to_lowercase()];
            terms.extend(kind.aliases().iter().map(|alias| alias.to_string()));
            let alternation = terms
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\b({alternation})\b");
            (kind, Regex::new(&pattern).expect("valid loan type pattern"))
        })
        .collect()
});

/// First pattern intent firing on lower-cased text.
pub(crate) fn detect(normalized: &str) -> Option<IntentId> {
    INTENT_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(normalized))
        .map(|(intent, _)| *intent)
}

/// Loan type named as a whole word (id, label or alias).
pub(crate) fn mentioned_loan_type(normalized: &str) -> Option<LoanTypeId> {
    LOAN_TYPE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(normalized))
        .map(|(kind, _)| *kind)
}
