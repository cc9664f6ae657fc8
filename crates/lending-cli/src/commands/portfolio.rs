use clap::Args;
use serde_json::Value;

use lending_core::record;
use lending_core::{portfolio, LoanRecord};

use crate::input;

/// Arguments for the portfolio summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to a JSON loan listing (bare array or {"loans": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the borrower position summary
#[derive(Args)]
pub struct BorrowerArgs {
    /// Path to a JSON loan listing (bare array or {"loans": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Load a loan listing from a file or piped stdin and run the wire-format
/// normalisation before anything touches the aggregators.
fn load_loans(input_path: &Option<String>) -> Result<Vec<LoanRecord>, Box<dyn std::error::Error>> {
    let data: Value = if let Some(path) = input_path {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file is required (or pipe a loan listing)".into());
    };
    Ok(record::from_value(data)?)
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans = load_loans(&args.input)?;
    let result = portfolio::summarise_portfolio(&loans)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_borrower(args: BorrowerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans = load_loans(&args.input)?;
    let result = portfolio::summarise_borrower(&loans)?;
    Ok(serde_json::to_value(result)?)
}
