//! Month-by-month repayment schedules for an annuity loan, the table behind
//! the platform's payment-schedule export.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortisation::{annuity_instalment, monthly_rate, validate_terms};
use crate::types::*;
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Terms of the loan to schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Annual rate as a percentage (12 = 12%).
    pub annual_rate: Percent,
    pub term_months: u32,
    /// Due date of the first instalment; later rows step one calendar month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// A single instalment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleOutput {
    pub monthly_payment: Money,
    pub periods: Vec<SchedulePeriod>,
    pub total_interest_paid: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full instalment table for a loan. The final payment is trued up
/// so the closing balance lands exactly at zero.
pub fn build_payment_schedule(
    input: &ScheduleInput,
) -> LendingResult<ComputationOutput<PaymentScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_rate, input.term_months)?;

    let rate = monthly_rate(input.annual_rate);
    if rate.is_zero() {
        warnings.push("Zero interest rate; instalments are straight-line principal".into());
    }

    let term = Decimal::from(input.term_months);
    let instalment = annuity_instalment(input.principal, rate, term);

    let mut periods = Vec::with_capacity(input.term_months as usize);
    let mut balance = input.principal;
    let mut total_interest_paid = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=input.term_months {
        let opening = balance;
        let interest = opening * rate;

        // True up the last row so residual precision never leaves a balance.
        let (payment, principal) = if period == input.term_months {
            (opening + interest, opening)
        } else {
            (instalment, instalment - interest)
        };

        balance = opening - principal;
        total_interest_paid += interest;
        total_paid += payment;

        let due_date = match input.first_payment_date {
            Some(first) => Some(
                first
                    .checked_add_months(Months::new(period - 1))
                    .ok_or_else(|| {
                        LendingError::DateError(format!(
                            "Due date overflows the calendar at period {period}"
                        ))
                    })?,
            ),
            None => None,
        };

        periods.push(SchedulePeriod {
            period,
            due_date,
            opening_balance: opening,
            payment,
            interest,
            principal,
            closing_balance: balance,
        });
    }

    let output = PaymentScheduleOutput {
        monthly_payment: instalment,
        periods,
        total_interest_paid,
        total_paid,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "final_payment": "trued up to a zero closing balance",
    });

    Ok(with_metadata(
        "Annuity payment schedule",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(30_000),
            annual_rate: dec!(12),
            term_months: 24,
            first_payment_date: None,
        }
    }

    #[test]
    fn test_schedule_fully_amortises() {
        let result = build_payment_schedule(&base_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.periods.len(), 24);
        assert_eq!(out.periods.last().unwrap().closing_balance, Decimal::ZERO);

        let principal_paid: Decimal = out.periods.iter().map(|p| p.principal).sum();
        assert_eq!(principal_paid.round_dp(6), dec!(30_000));
        assert_eq!(
            out.total_paid.round_dp(6),
            (dec!(30_000) + out.total_interest_paid).round_dp(6)
        );
    }

    #[test]
    fn test_interest_declines_each_period() {
        let result = build_payment_schedule(&base_input()).unwrap();
        let periods = &result.result.periods;
        for pair in periods.windows(2) {
            assert!(pair[1].interest < pair[0].interest);
        }
    }

    #[test]
    fn test_due_dates_step_calendar_months() {
        let mut input = base_input();
        input.term_months = 3;
        input.first_payment_date = NaiveDate::from_ymd_opt(2026, 1, 31);
        let result = build_payment_schedule(&input).unwrap();
        let due: Vec<NaiveDate> = result
            .result
            .periods
            .iter()
            .filter_map(|p| p.due_date)
            .collect();
        // Chrono clamps the 31st to the shorter months.
        assert_eq!(
            due,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn test_no_dates_without_first_payment() {
        let result = build_payment_schedule(&base_input()).unwrap();
        assert!(result.result.periods.iter().all(|p| p.due_date.is_none()));
    }

    #[test]
    fn test_zero_rate_schedule() {
        let input = ScheduleInput {
            principal: dec!(6_000),
            annual_rate: Decimal::ZERO,
            term_months: 6,
            first_payment_date: None,
        };
        let result = build_payment_schedule(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.monthly_payment, dec!(1_000));
        assert_eq!(out.total_interest_paid, Decimal::ZERO);
        assert!(out.periods.iter().all(|p| p.interest.is_zero()));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut input = base_input();
        input.principal = dec!(-1);
        let err = build_payment_schedule(&input).unwrap_err();
        match err {
            LendingError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
