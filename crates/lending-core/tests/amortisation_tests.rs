use lending_core::amortisation::{
    calculate_amortisation, calculate_flat_estimate, AmortisationInput,
};
use lending_core::schedule::{build_payment_schedule, ScheduleInput};
use lending_core::LendingError;
use pretty_assertions::assert_eq;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

// ===========================================================================
// Quote tests
// ===========================================================================

fn marketing_page_quote() -> AmortisationInput {
    // The public calculator's defaults: 30k over 24 months at the standard
    // 12% rate.
    AmortisationInput {
        principal: dec!(30_000),
        annual_rate: dec!(12),
        term_months: 24,
    }
}

#[test]
fn test_annuity_matches_closed_form_reference() {
    let result = calculate_amortisation(&marketing_page_quote()).unwrap();
    let out = &result.result;

    // r = 0.01/month; P * r(1+r)^n / ((1+r)^n - 1) = 1,412.20
    assert_eq!(out.monthly_payment.round_dp(2), dec!(1412.20));
    assert_eq!(out.processing_fee, dec!(600));
    assert_eq!(out.disbursed_amount, dec!(29_400));

    // Total interest is derivable from the instalment.
    let expected_interest = out.monthly_payment * dec!(24) - dec!(30_000);
    assert_eq!(out.total_interest, expected_interest);
}

#[test]
fn test_zero_rate_quote_is_exact_division() {
    let input = AmortisationInput {
        principal: dec!(9_000),
        annual_rate: Decimal::ZERO,
        term_months: 18,
    };
    let result = calculate_amortisation(&input).unwrap();
    assert_eq!(result.result.monthly_payment, dec!(500));
}

#[test]
fn test_flat_estimate_borrower_calculator() {
    let input = AmortisationInput {
        principal: dec!(50_000),
        annual_rate: dec!(12),
        term_months: 12,
    };
    let result = calculate_flat_estimate(&input).unwrap();
    assert_eq!(result.result.monthly_payment.round_dp(2), dec!(4666.67));
    assert_eq!(result.result.processing_fee, dec!(1_000));
    assert_eq!(result.result.disbursed_amount, dec!(49_000));
}

#[test]
fn test_quotes_stay_positive_across_the_product_range() {
    // The product caps applications between 5k and 5M pesos.
    for principal in [dec!(5_000), dec!(100_000), dec!(5_000_000)] {
        for term in [6u32, 12, 24, 36, 60] {
            let input = AmortisationInput {
                principal,
                annual_rate: dec!(12),
                term_months: term,
            };
            let out = calculate_amortisation(&input).unwrap().result;
            assert!(out.monthly_payment > Decimal::ZERO);
            assert!(out.disbursed_amount < principal);
        }
    }
}

#[test]
fn test_invalid_quote_propagates() {
    let input = AmortisationInput {
        principal: dec!(-5_000),
        annual_rate: dec!(12),
        term_months: 12,
    };
    assert!(matches!(
        calculate_amortisation(&input).unwrap_err(),
        LendingError::InvalidInput { .. }
    ));
    assert!(matches!(
        calculate_flat_estimate(&input).unwrap_err(),
        LendingError::InvalidInput { .. }
    ));
}

// ===========================================================================
// Schedule tests
// ===========================================================================

#[test]
fn test_schedule_consistent_with_quote() {
    let quote = calculate_amortisation(&marketing_page_quote()).unwrap();
    let schedule = build_payment_schedule(&ScheduleInput {
        principal: dec!(30_000),
        annual_rate: dec!(12),
        term_months: 24,
        first_payment_date: None,
    })
    .unwrap();

    assert_eq!(
        schedule.result.monthly_payment,
        quote.result.monthly_payment
    );
    assert_eq!(schedule.result.periods.len(), 24);
    assert_eq!(
        schedule.result.periods.last().unwrap().closing_balance,
        Decimal::ZERO
    );

    let principal_paid: Decimal = schedule.result.periods.iter().map(|p| p.principal).sum();
    assert_eq!(principal_paid.round_dp(6), dec!(30_000));
}

#[test]
fn test_schedule_interest_sums_to_total() {
    let schedule = build_payment_schedule(&ScheduleInput {
        principal: dec!(120_000),
        annual_rate: dec!(18),
        term_months: 36,
        first_payment_date: None,
    })
    .unwrap();
    let out = &schedule.result;

    let interest_sum: Decimal = out.periods.iter().map(|p| p.interest).sum();
    assert_eq!(interest_sum, out.total_interest_paid);

    let rounded_total = out
        .total_paid
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rounded_parts = (dec!(120_000) + out.total_interest_paid)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(rounded_total, rounded_parts);
}
