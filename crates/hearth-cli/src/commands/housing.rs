use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hearth_core::buy_vs_rent::{self, ScenarioInput};
use hearth_core::cash_allocation::{
    compute_cash_allocation, CashAllocationInput, CashSource,
};
use hearth_core::mortgage::LoanTerms;
use hearth_core::types::{Money, Rate};

use crate::input;

const DEFAULT_BRACKETS: &str = "data/tax_brackets.csv";

/// Scenario file layout: projection parameters plus the raw cash pool. The
/// down payment is derived here rather than supplied directly.
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub purchase_price: Money,
    pub mortgage_rate: Rate,
    pub loan_term_years: u32,
    pub maintenance_rate: Rate,
    pub property_tax_rate: Rate,
    #[serde(default)]
    pub hoa_annual: Money,
    pub home_insurance_annual: Money,
    pub initial_monthly_rent: Money,
    pub rent_growth: Rate,
    pub renter_insurance_annual: Money,
    pub home_price_growth: Rate,
    pub closing_cost_rate: Rate,
    pub selling_cost_rate: Rate,
    pub mortgage_deduction_cap: Money,
    pub broker_fee_months: u32,
    pub security_deposit_months: u32,
    pub deposit_return: Rate,
    pub holding_period_years: u32,
    pub investment_return: Rate,
    #[serde(default)]
    pub assume_tax_cuts_expire: bool,
    pub taxable_income: Money,
    pub cash_sources: Vec<CashSource>,
    pub discretionary_budget: Money,
    pub safety_margin: Money,
}

impl ScenarioFile {
    fn into_scenario(self) -> ScenarioInput {
        let cash_allocation = compute_cash_allocation(&CashAllocationInput {
            purchase_price: self.purchase_price,
            closing_cost_rate: self.closing_cost_rate,
            discretionary_budget: self.discretionary_budget,
            safety_margin: self.safety_margin,
            cash_sources: self.cash_sources,
        });
        ScenarioInput {
            purchase_price: self.purchase_price,
            mortgage_rate: self.mortgage_rate,
            loan_term_years: self.loan_term_years,
            maintenance_rate: self.maintenance_rate,
            property_tax_rate: self.property_tax_rate,
            hoa_annual: self.hoa_annual,
            home_insurance_annual: self.home_insurance_annual,
            initial_monthly_rent: self.initial_monthly_rent,
            rent_growth: self.rent_growth,
            renter_insurance_annual: self.renter_insurance_annual,
            home_price_growth: self.home_price_growth,
            closing_cost_rate: self.closing_cost_rate,
            selling_cost_rate: self.selling_cost_rate,
            mortgage_deduction_cap: self.mortgage_deduction_cap,
            broker_fee_months: self.broker_fee_months,
            security_deposit_months: self.security_deposit_months,
            deposit_return: self.deposit_return,
            holding_period_years: self.holding_period_years,
            investment_return: self.investment_return,
            assume_tax_cuts_expire: self.assume_tax_cuts_expire,
            taxable_income: self.taxable_income,
            cash_allocation,
        }
    }
}

/// Arguments for the full buy-vs-rent projection
#[derive(Args)]
pub struct BuyVsRentArgs {
    /// Path to JSON scenario file
    #[arg(long)]
    pub input: Option<String>,

    /// Path to the tax bracket CSV
    #[arg(long, default_value = DEFAULT_BRACKETS)]
    pub brackets: String,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual rate as a decimal fraction (0.0575 = 5.75%)
    #[arg(long)]
    pub annual_rate: Decimal,

    /// Loan term in years
    #[arg(long)]
    pub term_years: u32,

    /// Also report the balance after this many monthly payments
    #[arg(long)]
    pub after_months: Option<u32>,
}

/// Arguments for cash allocation
#[derive(Args)]
pub struct CashAllocationArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_buy_vs_rent(args: BuyVsRentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: ScenarioFile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <scenario.json> or stdin required for buy-vs-rent".into());
    };

    let table = input::brackets::load_bracket_table(&args.brackets)?;
    let result = buy_vs_rent::project_buy_vs_rent(&file.into_scenario(), &table)?;
    Ok(serde_json::to_value(result)?)
}

#[derive(Serialize)]
struct YearEndBalance {
    year: u32,
    balance: Money,
    interest_paid: Money,
}

#[derive(Serialize)]
struct AmortizationSummary {
    loan_amount: Money,
    annual_rate: Rate,
    term_years: u32,
    monthly_payment: Money,
    annual_debt_service: Money,
    total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance_after_months: Option<Money>,
    year_end_balances: Vec<YearEndBalance>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.loan_amount < Decimal::ZERO {
        return Err("loan amount cannot be negative".into());
    }
    let terms = LoanTerms {
        loan_amount: args.loan_amount,
        annual_rate: args.annual_rate,
        term_years: args.term_years,
    };

    let mut total_interest = Decimal::ZERO;
    let mut year_end_balances = Vec::with_capacity(args.term_years as usize);
    for year in 0..args.term_years {
        let interest_paid = terms.annual_interest(year);
        total_interest += interest_paid;
        year_end_balances.push(YearEndBalance {
            year: year + 1,
            balance: terms.remaining_balance((year + 1) * 12),
            interest_paid,
        });
    }

    let summary = AmortizationSummary {
        loan_amount: terms.loan_amount,
        annual_rate: terms.annual_rate,
        term_years: terms.term_years,
        monthly_payment: terms.monthly_payment(),
        annual_debt_service: terms.annual_debt_service(),
        total_interest,
        balance_after_months: args.after_months.map(|m| terms.remaining_balance(m)),
        year_end_balances,
    };
    Ok(serde_json::to_value(summary)?)
}

pub fn run_cash_allocation(args: CashAllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let alloc_input: CashAllocationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for cash allocation".into());
    };
    let summary = compute_cash_allocation(&alloc_input);
    Ok(serde_json::to_value(summary)?)
}
