use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use hearth_core::tax::brackets::compute_tax;
use hearth_core::tax::income::{post_tax_income, PostTaxIncomeInput};
use hearth_core::types::{Money, Rate};

use crate::input;

const DEFAULT_BRACKETS: &str = "data/tax_brackets.csv";

/// Arguments for a single-jurisdiction tax estimate
#[derive(Args)]
pub struct TaxArgs {
    /// Taxable income
    #[arg(long)]
    pub income: Decimal,

    /// Jurisdiction name as it appears in the bracket CSV
    #[arg(long)]
    pub jurisdiction: String,

    /// Path to the tax bracket CSV
    #[arg(long, default_value = DEFAULT_BRACKETS)]
    pub brackets: String,
}

/// Arguments for post-tax income
#[derive(Args)]
pub struct PostTaxIncomeArgs {
    /// Taxable income
    #[arg(long)]
    pub income: Decimal,

    /// Model the 2017 tax-cut provisions as expired
    #[arg(long)]
    pub assume_tax_cuts_expire: bool,

    /// Path to the tax bracket CSV
    #[arg(long, default_value = DEFAULT_BRACKETS)]
    pub brackets: String,
}

#[derive(Serialize)]
struct TaxEstimate {
    jurisdiction: String,
    income: Money,
    tax: Money,
    effective_rate: Rate,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::brackets::load_bracket_table(&args.brackets)?;

    if !table.has_jurisdiction(&args.jurisdiction) {
        let known: Vec<&str> = {
            let mut names: Vec<&str> = table
                .brackets()
                .iter()
                .map(|b| b.jurisdiction.as_str())
                .collect();
            names.dedup();
            names
        };
        return Err(format!(
            "unknown jurisdiction '{}' (known: {})",
            args.jurisdiction,
            known.join(", ")
        )
        .into());
    }

    let tax = compute_tax(args.income, &args.jurisdiction, &table);
    let effective_rate = if args.income > Decimal::ZERO {
        tax / args.income
    } else {
        Decimal::ZERO
    };

    let estimate = TaxEstimate {
        jurisdiction: args.jurisdiction,
        income: args.income,
        tax,
        effective_rate,
    };
    Ok(serde_json::to_value(estimate)?)
}

pub fn run_post_tax_income(args: PostTaxIncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::brackets::load_bracket_table(&args.brackets)?;
    let result = post_tax_income(
        &PostTaxIncomeInput {
            taxable_income: args.income,
            assume_tax_cuts_expire: args.assume_tax_cuts_expire,
        },
        &table,
    )?;
    Ok(serde_json::to_value(result)?)
}
