use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::amortisation::{self, AmortisationInput};
use lending_core::schedule::{self, ScheduleInput};

use crate::input;

/// Arguments for the annuity quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortiseArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,
}

/// Arguments for the flat-rate quick estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FlatEstimateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,
}

/// Arguments for the payment schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Due date of the first instalment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

fn quote_input(
    input_path: &Option<String>,
    principal: Option<Decimal>,
    annual_rate: Option<Decimal>,
    term_months: Option<u32>,
) -> Result<AmortisationInput, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        return Ok(input::file::read_json(path)?);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(AmortisationInput {
        principal: principal.ok_or("--principal is required (or provide --input)")?,
        annual_rate: annual_rate.ok_or("--annual-rate is required (or provide --input)")?,
        term_months: term_months.ok_or("--term-months is required (or provide --input)")?,
    })
}

pub fn run_amortise(args: AmortiseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote = quote_input(&args.input, args.principal, args.annual_rate, args.term_months)?;
    let result = amortisation::calculate_amortisation(&quote)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_flat_estimate(args: FlatEstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote = quote_input(&args.input, args.principal, args.annual_rate, args.term_months)?;
    let result = amortisation::calculate_flat_estimate(&quote)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            first_payment_date: args.first_payment_date,
        }
    };

    let result = schedule::build_payment_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
