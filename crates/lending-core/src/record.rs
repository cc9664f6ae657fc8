//! Wire-format boundary for loan payloads.
//!
//! The platform API serialises numeric fields as either JSON strings or bare
//! numbers, and timestamps in more than one shape. Everything is normalised
//! into a strict [`LoanRecord`] here; no calculation coerces types itself.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{BorrowerRef, LoanRecord, Money, Percent};
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A loan exactly as the REST API serialises it. `Decimal` fields accept both
/// `"50000.00"` and `50000` payload shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLoanRecord {
    pub id: u64,
    pub principal_amount: Money,
    #[serde(default)]
    pub approved_amount: Option<Money>,
    pub interest_rate: Percent,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub outstanding_balance: Option<Money>,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub next_payment_date: Option<String>,
    #[serde(default)]
    pub borrower: Option<RawBorrower>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBorrower {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Listing envelope the API wraps around loan collections.
#[derive(Debug, Deserialize)]
struct LoanListing {
    loans: Vec<RawLoanRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalise one wire record into a strict [`LoanRecord`].
pub fn normalise(raw: RawLoanRecord) -> LendingResult<LoanRecord> {
    if raw.principal_amount <= Decimal::ZERO {
        return Err(invalid(raw.id, "principal_amount", "must be positive"));
    }
    let term_months = match raw.term_months {
        Some(t) if t >= 1 => t,
        _ => return Err(invalid(raw.id, "term_months", "must be at least one month")),
    };
    if raw.interest_rate < Decimal::ZERO {
        return Err(invalid(raw.id, "interest_rate", "cannot be negative"));
    }
    let outstanding_balance = raw.outstanding_balance.unwrap_or(Decimal::ZERO);
    if outstanding_balance < Decimal::ZERO {
        return Err(invalid(raw.id, "outstanding_balance", "cannot be negative"));
    }
    if let Some(approved) = raw.approved_amount {
        if approved < Decimal::ZERO {
            return Err(invalid(raw.id, "approved_amount", "cannot be negative"));
        }
    }

    let status = raw.status.parse()?;
    let created_at = parse_timestamp("created_at", &raw.created_at)?;
    let updated_at = raw
        .updated_at
        .as_deref()
        .map(|s| parse_timestamp("updated_at", s))
        .transpose()?;
    let next_payment_date = raw
        .next_payment_date
        .as_deref()
        .map(|s| parse_date("next_payment_date", s))
        .transpose()?;

    Ok(LoanRecord {
        id: raw.id,
        principal_amount: raw.principal_amount,
        approved_amount: raw.approved_amount,
        interest_rate: raw.interest_rate,
        term_months,
        outstanding_balance,
        status,
        created_at,
        updated_at,
        next_payment_date,
        borrower: raw.borrower.map(|b| BorrowerRef {
            id: b.id,
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
        }),
    })
}

/// Normalise a whole listing, failing on the first malformed record.
pub fn normalise_all(raw: Vec<RawLoanRecord>) -> LendingResult<Vec<LoanRecord>> {
    raw.into_iter().map(normalise).collect()
}

/// Deserialise and normalise a listing already parsed to JSON. Accepts both
/// a bare array and the API's `{"loans": [...]}` envelope.
pub fn from_value(value: serde_json::Value) -> LendingResult<Vec<LoanRecord>> {
    let raw = match serde_json::from_value::<Vec<RawLoanRecord>>(value.clone()) {
        Ok(raw) => raw,
        Err(_) => serde_json::from_value::<LoanListing>(value)?.loans,
    };
    normalise_all(raw)
}

/// Deserialise and normalise a JSON loan listing.
pub fn from_json(json: &str) -> LendingResult<Vec<LoanRecord>> {
    from_value(serde_json::from_str(json)?)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn invalid(loan_id: u64, field: &str, reason: &str) -> LendingError {
    LendingError::InvalidInput {
        field: field.into(),
        reason: format!("Loan {loan_id}: {reason}."),
    }
}

/// The API emits RFC 3339 from newer endpoints and `YYYY-MM-DD HH:MM:SS`
/// from older ones; date-only values show up in exports.
fn parse_timestamp(field: &str, value: &str) -> LendingResult<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(LendingError::DateError(format!(
        "Unrecognised {field} timestamp: {value}"
    )))
}

fn parse_date(field: &str, value: &str) -> LendingResult<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d);
    }
    parse_timestamp(field, value).map(|dt| dt.date())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_string_and_number_decimals_both_parse() {
        let json = r#"[
            {
                "id": 1,
                "principal_amount": "50000.00",
                "approved_amount": 45000,
                "interest_rate": "12",
                "term_months": 12,
                "outstanding_balance": "45000.00",
                "status": "approved",
                "created_at": "2025-06-01T09:30:00Z"
            }
        ]"#;
        let loans = from_json(json).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].principal_amount, dec!(50_000));
        assert_eq!(loans[0].approved_amount, Some(dec!(45_000)));
        assert_eq!(loans[0].status, LoanStatus::Approved);
    }

    #[test]
    fn test_listing_envelope_accepted() {
        let json = r#"{"loans": [
            {
                "id": 2,
                "principal_amount": "10000",
                "interest_rate": "10",
                "term_months": 6,
                "status": "pending",
                "created_at": "2025-03-10 14:22:05"
            }
        ]}"#;
        let loans = from_json(json).unwrap();
        assert_eq!(loans.len(), 1);
        // Missing outstanding_balance defaults to zero.
        assert_eq!(loans[0].outstanding_balance, Decimal::ZERO);
    }

    #[test]
    fn test_borrower_join_preserved() {
        let json = r#"[
            {
                "id": 3,
                "principal_amount": "10000",
                "interest_rate": "10",
                "term_months": 6,
                "status": "pending",
                "created_at": "2025-03-10 14:22:05",
                "borrower": {"id": 9, "first_name": "Juan", "last_name": "Dela Cruz"}
            }
        ]"#;
        let loans = from_json(json).unwrap();
        let borrower = loans[0].borrower.as_ref().unwrap();
        assert_eq!(borrower.id, 9);
        assert_eq!(borrower.first_name, "Juan");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#"[
            {
                "id": 4,
                "principal_amount": "10000",
                "interest_rate": "10",
                "term_months": 6,
                "status": "frozen",
                "created_at": "2025-03-10 14:22:05"
            }
        ]"#;
        let err = from_json(json).unwrap_err();
        match err {
            LendingError::InvalidInput { field, .. } => assert_eq!(field, "status"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_principal_rejected() {
        let raw = RawLoanRecord {
            id: 5,
            principal_amount: Decimal::ZERO,
            approved_amount: None,
            interest_rate: dec!(10),
            term_months: Some(6),
            outstanding_balance: None,
            status: "pending".into(),
            created_at: "2025-01-01 00:00:00".into(),
            updated_at: None,
            next_payment_date: None,
            borrower: None,
        };
        let err = normalise(raw).unwrap_err();
        match err {
            LendingError::InvalidInput { field, .. } => assert_eq!(field, "principal_amount"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_term_rejected() {
        let json = r#"[
            {
                "id": 6,
                "principal_amount": "10000",
                "interest_rate": "10",
                "status": "pending",
                "created_at": "2025-03-10 14:22:05"
            }
        ]"#;
        let err = from_json(json).unwrap_err();
        match err {
            LendingError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_is_date_error() {
        let json = r#"[
            {
                "id": 7,
                "principal_amount": "10000",
                "interest_rate": "10",
                "term_months": 6,
                "status": "pending",
                "created_at": "last tuesday"
            }
        ]"#;
        let err = from_json(json).unwrap_err();
        match err {
            LendingError::DateError(msg) => assert!(msg.contains("created_at")),
            other => panic!("Expected DateError, got {other:?}"),
        }
    }

    #[test]
    fn test_next_payment_date_parsed() {
        let json = r#"[
            {
                "id": 8,
                "principal_amount": "10000",
                "interest_rate": "10",
                "term_months": 6,
                "status": "approved",
                "created_at": "2025-03-10 14:22:05",
                "next_payment_date": "2025-09-01"
            }
        ]"#;
        let loans = from_json(json).unwrap();
        assert_eq!(
            loans[0].next_payment_date,
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = from_json("not json").unwrap_err();
        match err {
            LendingError::SerializationError(_) => {}
            other => panic!("Expected SerializationError, got {other:?}"),
        }
    }
}
