//! Loan quotes: the fixed-payment annuity used on payment schedules and the
//! simplified flat-rate estimate shown on borrower-facing calculators. The
//! two intentionally disagree and must never be reconciled; each surface of
//! the platform quotes with its own formula.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Flat origination fee withheld from every disbursement.
pub const PROCESSING_FEE_RATE: Decimal = dec!(0.02);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Terms of a quoted loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortisationInput {
    pub principal: Money,
    /// Annual rate as a percentage (12 = 12%).
    pub annual_rate: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortisationOutput {
    pub monthly_payment: Money,
    pub processing_fee: Money,
    /// Principal minus the origination fee; what the borrower receives.
    pub disbursed_amount: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed-payment annuity quote: the level instalment that fully amortises the
/// principal over the term at the quoted annual rate, compounded monthly.
pub fn calculate_amortisation(
    input: &AmortisationInput,
) -> LendingResult<ComputationOutput<AmortisationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_rate, input.term_months)?;

    let rate = monthly_rate(input.annual_rate);
    if rate.is_zero() {
        warnings.push("Zero interest rate; instalments are straight-line principal".into());
    }

    let term = Decimal::from(input.term_months);
    let output = quote_output(input, annuity_instalment(input.principal, rate, term));

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "processing_fee_rate": PROCESSING_FEE_RATE.to_string(),
        "compounding": "monthly",
    });

    Ok(with_metadata(
        "Fixed-payment annuity amortisation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Simplified non-compounding quote used for borrower-facing quick estimates:
/// interest is charged once on the full principal and spread evenly across
/// the term. Yields a different figure than [`calculate_amortisation`].
pub fn calculate_flat_estimate(
    input: &AmortisationInput,
) -> LendingResult<ComputationOutput<AmortisationOutput>> {
    let start = Instant::now();

    validate_terms(input.principal, input.annual_rate, input.term_months)?;

    let term = Decimal::from(input.term_months);
    let interest_charge = input.principal * input.annual_rate / PERCENT;
    let monthly_payment = (input.principal + interest_charge) / term;

    let output = quote_output(input, monthly_payment);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "processing_fee_rate": PROCESSING_FEE_RATE.to_string(),
        "interest_basis": "simple, charged once on principal",
    });

    Ok(with_metadata(
        "Flat-rate quick estimate",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn monthly_rate(annual_rate: Percent) -> Decimal {
    annual_rate / PERCENT / MONTHS_PER_YEAR
}

/// Level instalment for a fully-amortising loan. Zero-rate terms fall back to
/// straight-line repayment, which keeps the annuity formula away from a zero
/// denominator. Inputs must already be validated.
pub(crate) fn annuity_instalment(principal: Money, monthly_rate: Decimal, term: Decimal) -> Money {
    if monthly_rate.is_zero() {
        return principal / term;
    }
    let growth = (Decimal::ONE + monthly_rate).powd(term);
    principal * (monthly_rate * growth) / (growth - Decimal::ONE)
}

/// Origination fee, rounded to the peso the way the calculators display it.
pub(crate) fn processing_fee(principal: Money) -> Money {
    (principal * PROCESSING_FEE_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn quote_output(input: &AmortisationInput, monthly_payment: Money) -> AmortisationOutput {
    let fee = processing_fee(input.principal);
    AmortisationOutput {
        monthly_payment,
        processing_fee: fee,
        disbursed_amount: input.principal - fee,
        total_interest: monthly_payment * Decimal::from(input.term_months) - input.principal,
    }
}

pub(crate) fn validate_terms(
    principal: Money,
    annual_rate: Percent,
    term_months: u32,
) -> LendingResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if term_months == 0 {
        return Err(LendingError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least one month.".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
