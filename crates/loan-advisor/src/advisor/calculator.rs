//! Equated monthly installment (EMI) and amortization math.
//!
//! All functions are pure: the caller decides whether and where a result is kept.
//!
//! EMI = P × r / [1 − (1 + r)^−n], with r = annual rate / 1200 and n in months.

use serde::{Deserialize, Serialize};

/// Longest tenure the calculator accepts (50 years).
pub const MAX_TENURE_MONTHS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CalculatorError {
    #[error(
        "invalid loan input: principal {principal}, annual rate {annual_rate_percent}%, tenure {tenure_months} months"
    )]
    InvalidInput {
        principal: f64,
        annual_rate_percent: f64,
        tenure_months: u32,
    },
}

fn invalid(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> CalculatorError {
    CalculatorError::InvalidInput {
        principal,
        annual_rate_percent,
        tenure_months,
    }
}

fn validate(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<(), CalculatorError> {
    let valid = principal.is_finite()
        && principal > 0.0
        && annual_rate_percent.is_finite()
        && annual_rate_percent >= 0.0
        && (1..=MAX_TENURE_MONTHS).contains(&tenure_months);

    if valid {
        Ok(())
    } else {
        Err(invalid(principal, annual_rate_percent, tenure_months))
    }
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 1200.0
}

/// Full-precision installment. Use [`round_currency`] before showing it to anyone.
pub fn compute_emi(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<f64, CalculatorError> {
    validate(principal, annual_rate_percent, tenure_months)?;

    if annual_rate_percent == 0.0 {
        return Ok(principal / tenure_months as f64);
    }

    let rate = monthly_rate(annual_rate_percent);
    let periods = i32::try_from(tenure_months)
        .map_err(|_| invalid(principal, annual_rate_percent, tenure_months))?;
    let discounted = 1.0 - (1.0 + rate).powi(-periods);
    if discounted == 0.0 {
        // rate too small to register in f64
        return Ok(principal / tenure_months as f64);
    }
    let emi = principal * rate / discounted;

    if emi.is_finite() && emi > 0.0 {
        Ok(emi)
    } else {
        Err(invalid(principal, annual_rate_percent, tenure_months))
    }
}

/// Round to two decimal places for presentation.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summary of what a loan costs over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub emi: f64,
    pub principal: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

/// `None` for invalid input; slider-driven callers routinely pass transient garbage.
pub fn compute_loan_details(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Option<LoanDetails> {
    let emi = round_currency(compute_emi(principal, annual_rate_percent, tenure_months).ok()?);
    let total_payment = emi * tenure_months as f64;
    let total_interest = total_payment - principal;
    if !(emi.is_finite() && total_payment.is_finite()) {
        return None;
    }

    Some(LoanDetails {
        emi,
        principal,
        total_interest,
        total_payment,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationEntry {
    pub period: u32,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

/// Month-by-month split of each installment into interest and principal.
pub fn build_amortization_schedule(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<Vec<AmortizationEntry>, CalculatorError> {
    let emi = compute_emi(principal, annual_rate_percent, tenure_months)?;
    let rate = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(tenure_months as usize);
    for period in 1..=tenure_months {
        let interest_portion = balance * rate;
        let principal_portion = emi - interest_portion;
        // floor guards the final period against floating-point drift
        balance = (balance - principal_portion).max(0.0);
        schedule.push(AmortizationEntry {
            period,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_free_emi_is_exact_division() {
        let emi = compute_emi(1_000_000.0, 0.0, 240).expect("valid input");
        assert_eq!(emi, 1_000_000.0 / 240.0);
    }

    #[test]
    fn standard_formula_matches_known_value() {
        // 1 lakh at 12% for 12 months
        let emi = compute_emi(100_000.0, 12.0, 12).expect("valid input");
        assert!((emi - 8884.88).abs() < 0.01, "emi was {emi}");
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(compute_emi(0.0, 8.5, 240).is_err());
        assert!(compute_emi(-5.0, 8.5, 240).is_err());
        assert!(compute_emi(100_000.0, -0.5, 240).is_err());
        assert!(compute_emi(100_000.0, 8.5, 0).is_err());
        assert!(compute_emi(f64::NAN, 8.5, 12).is_err());
        assert_eq!(
            compute_emi(0.0, 8.5, 240),
            Err(CalculatorError::InvalidInput {
                principal: 0.0,
                annual_rate_percent: 8.5,
                tenure_months: 240,
            })
        );
    }

    #[test]
    fn loan_details_totals_are_consistent() {
        let details = compute_loan_details(1_000_000.0, 8.5, 240).expect("valid input");
        assert_eq!(details.total_payment, details.emi * 240.0);
        assert_eq!(details.total_interest, details.total_payment - 1_000_000.0);
        assert_eq!(details.principal, 1_000_000.0);
        assert_eq!(details.emi, round_currency(details.emi));
        assert!((details.emi - 8678.23).abs() < 0.01, "emi was {}", details.emi);
    }

    #[test]
    fn loan_details_is_absent_for_invalid_input() {
        assert!(compute_loan_details(0.0, 8.5, 240).is_none());
        assert!(compute_loan_details(500_000.0, 8.5, 0).is_none());
        assert!(compute_loan_details(100_000.0, 12.0, 100_000).is_none());
        assert!(compute_loan_details(f64::MAX, 12.0, 600).is_none());
    }

    #[test]
    fn tenure_above_cap_is_rejected() {
        assert!(compute_emi(100_000.0, 12.0, MAX_TENURE_MONTHS).is_ok());
        assert!(compute_emi(100_000.0, 12.0, MAX_TENURE_MONTHS + 1).is_err());
        assert!(compute_emi(100_000.0, 12.0, 3_000_000_000).is_err());
        assert!(compute_emi(100_000.0, 0.0, u32::MAX).is_err());
        assert!(build_amortization_schedule(100_000.0, 12.0, u32::MAX).is_err());
    }

    #[test]
    fn negligible_rate_falls_back_to_even_split() {
        let emi = compute_emi(120_000.0, 1e-300, 12).expect("valid input");
        assert_eq!(emi, 10_000.0);
    }

    #[test]
    fn long_tenures_stay_finite() {
        let emi = compute_emi(1_000_000.0, 36.0, MAX_TENURE_MONTHS).expect("valid input");
        assert!(emi.is_finite());
        // interest alone is 3% a month, so the EMI barely exceeds it
        assert!((emi - 30_000.0).abs() < 1.0, "emi was {emi}");
    }

    #[test]
    fn schedule_pays_the_loan_down_to_zero() {
        let cases = [
            (1_000_000.0, 8.5, 240u32),
            (250_000.0, 11.5, 36),
            (60_000.0, 0.0, 12),
            (12_345.67, 19.99, 7),
        ];

        for (principal, rate, tenure) in cases {
            let schedule =
                build_amortization_schedule(principal, rate, tenure).expect("valid input");
            assert_eq!(schedule.len(), tenure as usize);
            assert_eq!(schedule[0].period, 1);

            let last = schedule.last().expect("non-empty schedule");
            assert_eq!(last.period, tenure);
            assert!(last.remaining_balance < 0.01, "balance {}", last.remaining_balance);

            let repaid: f64 = schedule.iter().map(|entry| entry.principal_portion).sum();
            assert!((repaid - principal).abs() < 0.01, "repaid {repaid} of {principal}");
        }
    }

    #[test]
    fn schedule_is_restartable() {
        let first = build_amortization_schedule(300_000.0, 9.0, 60).expect("valid input");
        let second = build_amortization_schedule(300_000.0, 9.0, 60).expect("valid input");
        assert_eq!(first, second);
    }
}
