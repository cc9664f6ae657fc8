//! Dashboard statistics over loan collections: the lender/admin portfolio
//! summary and the borrower's own position card.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::types::*;
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Distinct borrowers holding at least one loan.
    pub total_borrowers: u32,
    /// Approved loans still carrying a balance.
    pub active_loan_count: u32,
    /// Total approved amount across approved loans.
    pub monthly_volume: Money,
    /// Fully repaid approved loans as a share of borrower-resolvable loans,
    /// in percent to one decimal place.
    pub repayment_rate: Percent,
    pub status_counts: BTreeMap<LoanStatus, u32>,
    /// Approved volume bucketed by calendar month, January first. The index
    /// is month only; loans from different years share a bucket.
    pub monthly_approved_volume: Vec<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerPosition {
    pub total_borrowed: Money,
    /// Sum of per-loan flat instalments (the quick-quote basis, not the
    /// annuity figure).
    pub monthly_payment: Money,
    pub outstanding_balance: Money,
    pub active_loan_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summary statistics for the lender and admin dashboards. Loans without a
/// resolvable borrower stay in raw listings but are excluded from every
/// statistic here.
pub fn summarise_portfolio(
    loans: &[LoanRecord],
) -> LendingResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();

    let with_borrowers: Vec<&LoanRecord> =
        loans.iter().filter(|l| l.borrower.is_some()).collect();

    let borrower_ids: BTreeSet<u64> = with_borrowers
        .iter()
        .filter_map(|l| l.borrower.as_ref().map(|b| b.id))
        .collect();

    let active_loan_count = with_borrowers
        .iter()
        .filter(|l| l.status == LoanStatus::Approved && l.outstanding_balance > Decimal::ZERO)
        .count() as u32;

    let monthly_volume: Money = with_borrowers
        .iter()
        .filter(|l| l.status == LoanStatus::Approved)
        .map(|l| l.approved_amount.unwrap_or(Decimal::ZERO))
        .sum();

    let repaid_count = with_borrowers
        .iter()
        .filter(|l| l.status == LoanStatus::Approved && l.outstanding_balance.is_zero())
        .count();

    let repayment_rate = if with_borrowers.is_empty() {
        Decimal::ZERO
    } else {
        (Decimal::from(repaid_count) / Decimal::from(with_borrowers.len()) * dec!(100))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };

    let mut status_counts: BTreeMap<LoanStatus, u32> = BTreeMap::new();
    for loan in &with_borrowers {
        *status_counts.entry(loan.status).or_insert(0) += 1;
    }

    let mut monthly_approved_volume = vec![Decimal::ZERO; 12];
    for loan in &with_borrowers {
        if loan.status == LoanStatus::Approved {
            let slot = loan.created_at.month0() as usize;
            monthly_approved_volume[slot] += loan.approved_amount.unwrap_or(Decimal::ZERO);
        }
    }

    let summary = PortfolioSummary {
        total_borrowers: borrower_ids.len() as u32,
        active_loan_count,
        monthly_volume,
        repayment_rate,
        status_counts,
        monthly_approved_volume,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "statistic_scope": "loans with a resolvable borrower",
        "volume_buckets": "calendar month, all years",
    });

    Ok(with_metadata(
        "Loan portfolio summary",
        &assumptions,
        Vec::new(),
        elapsed,
        summary,
    ))
}

/// Position card for a single borrower's loan listing: totals across their
/// loans plus the next payment falling due.
pub fn summarise_borrower(
    loans: &[LoanRecord],
) -> LendingResult<ComputationOutput<BorrowerPosition>> {
    let start = Instant::now();

    let mut total_borrowed = Decimal::ZERO;
    let mut monthly_payment = Decimal::ZERO;
    let mut outstanding_balance = Decimal::ZERO;
    let mut active_loan_count = 0u32;
    let mut next_payment_date: Option<NaiveDate> = None;

    for loan in loans {
        if loan.term_months == 0 {
            return Err(LendingError::InvalidInput {
                field: "term_months".into(),
                reason: format!("Loan {} has a zero-month term.", loan.id),
            });
        }

        total_borrowed += loan.principal_amount;
        outstanding_balance += loan.outstanding_balance;

        if let Some(approved) = loan.approved_amount {
            let term = Decimal::from(loan.term_months);
            monthly_payment += approved / term + approved * loan.interest_rate / dec!(100) / term;
        }

        if loan.status == LoanStatus::Approved && loan.outstanding_balance > Decimal::ZERO {
            active_loan_count += 1;
            if next_payment_date.is_none() {
                next_payment_date = loan.next_payment_date;
            }
        }
    }

    let position = BorrowerPosition {
        total_borrowed,
        monthly_payment,
        outstanding_balance,
        active_loan_count,
        next_payment_date,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "instalment_basis": "flat estimate per loan",
    });

    Ok(with_metadata(
        "Borrower loan position",
        &assumptions,
        Vec::new(),
        elapsed,
        position,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
