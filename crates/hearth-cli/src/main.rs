mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::housing::{AmortizeArgs, BuyVsRentArgs, CashAllocationArgs};
use commands::tax::{PostTaxIncomeArgs, TaxArgs};

/// Buy-vs-rent housing projections with decimal precision
#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Buy-vs-rent housing projections with decimal precision",
    long_about = "A CLI for comparing the long-run cost of buying a home against \
                  renting. Supports full scenario projections, amortization \
                  schedules, marginal tax estimates, post-tax income, and \
                  down-payment cash allocation."
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
    /// Project total buy cost vs rent cost over a holding period
    BuyVsRent(BuyVsRentArgs),
    /// Level-payment mortgage schedule figures
    Amortize(AmortizeArgs),
    /// Marginal tax for an income in one jurisdiction
    Tax(TaxArgs),
    /// Net income after federal and NJ tax
    PostTaxIncome(PostTaxIncomeArgs),
    /// Split pooled cash into reserves and down payment
    CashAllocation(CashAllocationArgs),
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
        Commands::BuyVsRent(args) => commands::housing::run_buy_vs_rent(args),
        Commands::Amortize(args) => commands::housing::run_amortize(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::PostTaxIncome(args) => commands::tax::run_post_tax_income(args),
        Commands::CashAllocation(args) => commands::housing::run_cash_allocation(args),
        Commands::Version => {
            println!("hearth {}", env!("CARGO_PKG_VERSION"));
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
