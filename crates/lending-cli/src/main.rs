mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loans::{AmortiseArgs, FlatEstimateArgs, ScheduleArgs};
use commands::portfolio::{BorrowerArgs, SummaryArgs};

/// Loan amortisation and portfolio analytics
#[derive(Parser)]
#[command(
    name = "lfa",
    version,
    about = "Loan amortisation and portfolio analytics",
    long_about = "A CLI for the lending platform's finance calculations with \
                  decimal precision. Supports annuity and flat-rate quotes, \
                  month-by-month payment schedules, and portfolio summary \
                  statistics over exported loan listings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a fixed-payment annuity loan
    Amortise(AmortiseArgs),
    /// Quote the simplified flat-rate estimate
    FlatEstimate(FlatEstimateArgs),
    /// Build a month-by-month payment schedule
    Schedule(ScheduleArgs),
    /// Summarise a loan portfolio from a JSON listing
    Summary(SummaryArgs),
    /// Summarise a borrower's position from their loan listing
    Borrower(BorrowerArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortise(args) => commands::loans::run_amortise(args),
        Commands::FlatEstimate(args) => commands::loans::run_flat_estimate(args),
        Commands::Schedule(args) => commands::loans::run_schedule(args),
        Commands::Summary(args) => commands::portfolio::run_summary(args),
        Commands::Borrower(args) => commands::portfolio::run_borrower(args),
        Commands::Version => {
            println!("lfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
