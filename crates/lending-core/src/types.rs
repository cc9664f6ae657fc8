use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rates quoted as percentages (12 = 12%), exactly as the
/// loan API delivers them. Never pre-divided decimals.
pub type Percent = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
    JPY,
    Other(String),
}

/// Loan lifecycle states as reported by the platform API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Completed,
    Defaulted,
}

impl std::str::FromStr for LoanStatus {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            "defaulted" => Ok(Self::Defaulted),
            other => Err(LendingError::InvalidInput {
                field: "status".into(),
                reason: format!("Unknown loan status '{other}'"),
            }),
        }
    }
}

/// Borrower join carried on a loan when the identity is resolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRef {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A loan as the platform persists it, strictly typed. External payloads go
/// through the `record` boundary before reaching any calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: u64,
    pub principal_amount: Money,
    /// Funded amount; absent until a lender approves the application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<Money>,
    pub interest_rate: Percent,
    pub term_months: u32,
    pub outstanding_balance: Money,
    pub status: LoanStatus,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<BorrowerRef>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
