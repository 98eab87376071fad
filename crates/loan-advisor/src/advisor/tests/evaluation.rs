use super::common::*;
use crate::advisor::catalog::LoanTypeId;
use crate::advisor::evaluation::IneligibilityReason;

#[test]
fn strong_home_application_is_eligible_everywhere() {
    let verdicts = evaluator().evaluate(&application(), &catalog());

    let lenders: Vec<&str> = verdicts
        .iter()
        .map(|verdict| verdict.lender_id.as_str())
        .collect();
    assert_eq!(lenders, ["apex", "horizon", "summit"]);
    for verdict in &verdicts {
        assert!(verdict.eligible, "{}", verdict.summary());
        assert!(verdict.reasons.is_empty());
        assert!(verdict.estimated_monthly_installment.is_some());
    }
}

#[test]
fn lenders_without_the_product_are_excluded() {
    let mut application = application();
    application.loan_type = LoanTypeId::Gadget;
    application.amount = 60_000.0;
    application.tenure_years = 1.0;

    let verdicts = evaluator().evaluate(&application, &catalog());

    assert_eq!(verdicts.len(), 2);
    assert!(verdicts.iter().all(|verdict| verdict.lender_id != "summit"));
}

#[test]
fn affordability_reason_cites_installment_and_allowance() {
    let mut application = application();
    application.loan_type = LoanTypeId::Gadget;
    application.amount = 126_000.0;
    application.tenure_years = 1.0;
    application.monthly_income = 30_000.0;
    application.existing_emi = 10_000.0;

    let verdicts = evaluator().evaluate(&application, &catalog());
    let horizon = verdicts
        .iter()
        .find(|verdict| verdict.lender_id == "horizon")
        .expect("horizon offers gadget loans");

    assert_eq!(horizon.estimated_monthly_installment, Some(10_500.0));
    assert!(!horizon.eligible);
    assert_eq!(horizon.reasons.len(), 1);
    assert!(horizon.reasons[0].contains("10500"), "{}", horizon.reasons[0]);
    assert!(horizon.reasons[0].contains("10000"), "{}", horizon.reasons[0]);
    assert!(matches!(
        horizon.violations[0],
        IneligibilityReason::Unaffordable { allowed_emi, .. } if allowed_emi == 10_000.0
    ));
}

#[test]
fn credit_shortfall_and_tenure_excess_are_both_reported() {
    let mut application = application();
    application.credit_score = 660;
    application.tenure_years = 28.0;

    let verdicts = evaluator().evaluate(&application, &catalog());

    let apex = &verdicts[0];
    assert_eq!(apex.lender_id, "apex");
    assert!(!apex.eligible);
    assert_eq!(
        apex.violations,
        vec![IneligibilityReason::CreditScoreBelowMinimum {
            credit_score: 660,
            required: 700,
        }]
    );

    let horizon = &verdicts[1];
    assert!(!horizon.eligible);
    assert_eq!(
        horizon.violations,
        vec![IneligibilityReason::TenureExceedsMaximum {
            requested_years: 28.0,
            max_years: 25,
        }]
    );

    let summit = &verdicts[2];
    assert_eq!(summit.violations.len(), 2);
    assert_eq!(summit.reasons.len(), 2);
}

#[test]
fn installment_is_reported_even_when_ineligible() {
    let mut application = application();
    application.monthly_income = 10_000.0;

    let verdicts = evaluator().evaluate(&application, &catalog());

    for verdict in verdicts {
        assert!(!verdict.eligible);
        let emi = verdict
            .estimated_monthly_installment
            .expect("installment computed");
        assert!(emi > 0.0);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let evaluator = evaluator();
    let catalog = catalog();
    let first = evaluator.evaluate(&application(), &catalog);

    for _ in 0..5 {
        assert_eq!(evaluator.evaluate(&application(), &catalog), first);
    }
}
