//! Side-by-side lender comparison and catalog-wide rate statistics.

use serde::{Deserialize, Serialize};

use super::calculator::{compute_loan_details, LoanDetails};
use super::catalog::{LenderCatalog, LoanTypeId};

/// Snapshot shown for a bare "compare" request.
pub const DEFAULT_COMPARISON_LOAN_TYPE: LoanTypeId = LoanTypeId::Home;
pub const DEFAULT_COMPARISON_PRINCIPAL: f64 = 1_000_000.0;
pub const DEFAULT_COMPARISON_TENURE_MONTHS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub lender_id: String,
    pub lender_name: String,
    pub annual_rate_percent: f64,
    pub max_tenure_years: u32,
    pub min_credit_score: u16,
    pub application_url: String,
    /// Absent when the requested principal or tenure is invalid.
    pub details: Option<LoanDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderComparison {
    pub loan_type: LoanTypeId,
    pub principal: f64,
    pub tenure_months: u32,
    pub rows: Vec<ComparisonRow>,
    pub best_offer: Option<String>,
}

/// Every lender offering `loan_type`, cheapest rate first. Equal rates keep catalog order.
pub fn compare_lenders(
    catalog: &LenderCatalog,
    loan_type: LoanTypeId,
    principal: f64,
    tenure_months: u32,
) -> LenderComparison {
    let mut rows: Vec<ComparisonRow> = catalog
        .offers_for(loan_type)
        .map(|(lender, offer)| ComparisonRow {
            lender_id: lender.id.clone(),
            lender_name: lender.name.clone(),
            annual_rate_percent: offer.annual_rate_percent,
            max_tenure_years: offer.max_tenure_years,
            min_credit_score: offer.min_credit_score,
            application_url: lender.application_url.clone(),
            details: compute_loan_details(principal, offer.annual_rate_percent, tenure_months),
        })
        .collect();

    rows.sort_by(|a, b| a.annual_rate_percent.total_cmp(&b.annual_rate_percent));
    let best_offer = rows.first().map(|row| row.lender_id.clone());

    LenderComparison {
        loan_type,
        principal,
        tenure_months,
        rows,
        best_offer,
    }
}

pub fn default_comparison(catalog: &LenderCatalog) -> LenderComparison {
    compare_lenders(
        catalog,
        DEFAULT_COMPARISON_LOAN_TYPE,
        DEFAULT_COMPARISON_PRINCIPAL,
        DEFAULT_COMPARISON_TENURE_MONTHS,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTypeAverage {
    pub loan_type: LoanTypeId,
    pub average_rate: f64,
    pub offers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub total_offers: usize,
    pub average_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub per_loan_type: Vec<LoanTypeAverage>,
    pub lowest_average_type: LoanTypeId,
    pub highest_average_type: LoanTypeId,
    pub most_offerings_lender: String,
    pub most_offerings_count: usize,
}

/// Catalog-wide rate figures; `None` when no lender lists any offer.
pub fn market_stats(catalog: &LenderCatalog) -> Option<MarketStats> {
    let rates: Vec<f64> = catalog
        .lenders()
        .iter()
        .flat_map(|lender| lender.offers.iter().map(|offer| offer.annual_rate_percent))
        .collect();
    if rates.is_empty() {
        return None;
    }

    let total_offers = rates.len();
    let average_rate = rates.iter().sum::<f64>() / total_offers as f64;
    let min_rate = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let max_rate = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let per_loan_type: Vec<LoanTypeAverage> = LoanTypeId::ALL
        .into_iter()
        .filter_map(|loan_type| {
            let type_rates: Vec<f64> = catalog
                .offers_for(loan_type)
                .map(|(_, offer)| offer.annual_rate_percent)
                .collect();
            if type_rates.is_empty() {
                return None;
            }
            Some(LoanTypeAverage {
                loan_type,
                average_rate: type_rates.iter().sum::<f64>() / type_rates.len() as f64,
                offers: type_rates.len(),
            })
        })
        .collect();

    // strict comparisons keep the first entry on ties
    let mut lowest = &per_loan_type[0];
    let mut highest = &per_loan_type[0];
    for entry in &per_loan_type[1..] {
        if entry.average_rate < lowest.average_rate {
            lowest = entry;
        }
        if entry.average_rate > highest.average_rate {
            highest = entry;
        }
    }
    let (lowest_average_type, highest_average_type) = (lowest.loan_type, highest.loan_type);

    let mut busiest = &catalog.lenders()[0];
    for lender in &catalog.lenders()[1..] {
        if lender.offers.len() > busiest.offers.len() {
            busiest = lender;
        }
    }

    Some(MarketStats {
        total_offers,
        average_rate,
        min_rate,
        max_rate,
        per_loan_type,
        lowest_average_type,
        highest_average_type,
        most_offerings_lender: busiest.id.clone(),
        most_offerings_count: busiest.offers.len(),
    })
}
