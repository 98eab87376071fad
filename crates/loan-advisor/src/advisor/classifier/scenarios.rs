//! Situations the advisor recognizes and the product it recommends for each.
//!
//! Rules are data: adding a scenario means adding a row to [`SCENARIO_TABLE`]. The first rule
//! whose patterns match wins, so more specific rules sit above broader ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::catalog::LoanTypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    TechGear,
    Wedding,
    StudyAbroad,
    HigherEducation,
    BusinessNew,
    BusinessExpansion,
    HomeRenovation,
    HomePurchase,
    VehiclePurchase,
    MedicalEmergency,
    Travel,
    DebtConsolidation,
}

struct ScenarioDefinition {
    id: ScenarioId,
    loan_type: LoanTypeId,
    title: &'static str,
    response: &'static str,
    primary: &'static str,
    secondary: Option<&'static str>,
}

const SCENARIO_TABLE: &[ScenarioDefinition] = &[
    ScenarioDefinition {
        id: ScenarioId::TechGear,
        loan_type: LoanTypeId::Gadget,
        title: "Gadget Loan",
        response: "For a laptop, phone or other electronics, a **Gadget Loan** is the best fit. \
                   Tenures are short and some lenders run 0% EMI schemes on consumer devices.",
        primary: r"\b(laptops?|macbooks?|iphones?|smartphones?|phones?|mobiles?|tablets?|ipads?|cameras?|gaming consoles?|televisions?|tv)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::Wedding,
        loan_type: LoanTypeId::Personal,
        title: "Personal Loan",
        response: "Weddings are usually financed with a **Personal Loan**. It needs no collateral \
                   and the money can cover venues, jewellery and catering alike.",
        primary: r"\b(wedding|marriage|shaadi|engagement)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::StudyAbroad,
        loan_type: LoanTypeId::Education,
        title: "Education Loan",
        response: "Studying abroad is covered by an **Education Loan**. Overseas courses qualify \
                   for higher limits, and tuition, living costs and travel can be included.",
        primary: r"\b(abroad|overseas|foreign|usa|uk|canada|australia|germany)\b",
        secondary: Some(
            r"\b(study|studies|studying|university|universities|college|masters|ms|mba|phd|degree|course)\b",
        ),
    },
    ScenarioDefinition {
        id: ScenarioId::HigherEducation,
        loan_type: LoanTypeId::Education,
        title: "Education Loan",
        response: "An **Education Loan** is designed for college and university fees. Repayment \
                   usually starts after the course ends.",
        primary: r"\b(college|university|tuition|degree|masters|mba|phd|course fees?|school fees?)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::BusinessNew,
        loan_type: LoanTypeId::Business,
        title: "Business Loan",
        response: "To launch a new venture, look at a **Business Loan**. Lenders will ask for a \
                   business plan, and startup schemes can lower the collateral you need.",
        primary: r"\b(start|starting|launch|launching|open|opening|new|startup)\b",
        secondary: Some(r"\b(business|startup|shop|cafe|restaurant|store|venture|company)\b"),
    },
    ScenarioDefinition {
        id: ScenarioId::BusinessExpansion,
        loan_type: LoanTypeId::Business,
        title: "Business Loan",
        response: "Growing an existing business fits a **Business Loan** or working-capital line. \
                   Your turnover and filing history drive the limit you are offered.",
        primary: r"\b(expand|expanding|expansion|grow|growing|scale|scaling)\b",
        secondary: Some(r"\b(business|shop|company|store|factory|firm|operations)\b"),
    },
    ScenarioDefinition {
        id: ScenarioId::HomeRenovation,
        loan_type: LoanTypeId::Home,
        title: "Home Loan",
        response: "Renovations can be funded as a top-up on a **Home Loan**, which usually costs \
                   less than an unsecured personal loan.",
        primary: r"\b(renovate|renovating|renovation|remodel|remodelling|remodeling|home improvement|interiors?)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::HomePurchase,
        loan_type: LoanTypeId::Home,
        title: "Home Loan",
        response: "Buying or building a home is what a **Home Loan** is for. It offers the lowest \
                   rates and the longest tenures, up to 30 years.",
        primary: r"\b(buy|buying|purchase|purchasing|build|building|construct|constructing)\b",
        secondary: Some(r"\b(house|home|flat|apartment|property|plot|villa)\b"),
    },
    ScenarioDefinition {
        id: ScenarioId::VehiclePurchase,
        loan_type: LoanTypeId::Auto,
        title: "Auto Loan",
        response: "An **Auto Loan** covers new and used vehicles. The vehicle secures the loan, \
                   which keeps the rate below a personal loan.",
        primary: r"\b(buy|buying|purchase|purchasing|new|upgrade|upgrading)\b",
        secondary: Some(r"\b(car|cars|bike|scooter|motorcycle|vehicle|suv)\b"),
    },
    ScenarioDefinition {
        id: ScenarioId::MedicalEmergency,
        loan_type: LoanTypeId::Personal,
        title: "Personal Loan",
        response: "For medical bills a **Personal Loan** is the quickest option. Many lenders \
                   disburse within a day for pre-approved customers.",
        primary: r"\b(medical|hospital|surgery|treatment|emergency|illness)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::Travel,
        loan_type: LoanTypeId::Personal,
        title: "Personal Loan",
        response: "Trips and holidays are typically financed with a short-tenure **Personal Loan**.",
        primary: r"\b(travel|trip|vacation|holiday|honeymoon)\b",
        secondary: None,
    },
    ScenarioDefinition {
        id: ScenarioId::DebtConsolidation,
        loan_type: LoanTypeId::Personal,
        title: "Personal Loan",
        response: "A **Personal Loan** at a lower rate can consolidate credit card and other \
                   high-interest debt into a single EMI.",
        primary: r"\b(consolidate|consolidating|consolidation|pay off|clear|refinance)\b",
        secondary: Some(r"\b(debt|debts|credit cards?|dues|loans)\b"),
    },
];

/// A table row with its patterns compiled.
pub(crate) struct ScenarioRule {
    pub id: ScenarioId,
    pub loan_type: LoanTypeId,
    pub title: &'static str,
    pub response: &'static str,
    primary: Regex,
    secondary: Option<Regex>,
}

impl ScenarioRule {
    /// Both patterns must match when a secondary one is set.
    pub fn matches(&self, normalized: &str) -> bool {
        self.primary.is_match(normalized)
            && self
                .secondary
                .as_ref()
                .map_or(true, |pattern| pattern.is_match(normalized))
    }
}

pub(crate) static SCENARIO_RULES: Lazy<Vec<ScenarioRule>> = Lazy::new(|| {
    SCENARIO_TABLE
        .iter()
        .map(|definition| ScenarioRule {
            id: definition.id,
            loan_type: definition.loan_type,
            title: definition.title,
            response: definition.response,
            primary: Regex::new(definition.primary).expect("valid scenario pattern"),
            secondary: definition
                .secondary
                .map(|pattern| Regex::new(pattern).expect("valid scenario pattern")),
        })
        .collect()
});

/// First scenario, in priority order, matching lower-cased text.
pub(crate) fn detect(normalized: &str) -> Option<&'static ScenarioRule> {
    SCENARIO_RULES.iter().find(|rule| rule.matches(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(SCENARIO_RULES.len(), SCENARIO_TABLE.len());
    }

    #[test]
    fn conjunction_requires_both_patterns() {
        assert_eq!(
            detect("i want to study in canada").map(|rule| rule.id),
            Some(ScenarioId::StudyAbroad)
        );
        assert_eq!(
            detect("planning to travel to canada").map(|rule| rule.id),
            Some(ScenarioId::Travel)
        );
    }

    #[test]
    fn word_boundaries_avoid_partial_matches() {
        assert!(detect("tell me about my career options").is_none());
        assert!(detect("am i eligible for a loan").is_none());
    }

    #[test]
    fn business_rules_distinguish_new_from_expansion() {
        assert_eq!(
            detect("i want to start a coffee shop").map(|rule| rule.id),
            Some(ScenarioId::BusinessNew)
        );
        assert_eq!(
            detect("looking to expand my business").map(|rule| rule.id),
            Some(ScenarioId::BusinessExpansion)
        );
    }
}
