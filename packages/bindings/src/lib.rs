use napi::Result as NapiResult;
use napi_derive::napi;

use hearth_core::tax::brackets::{TaxBracket, TaxBracketTable};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_bracket_table(brackets_json: &str) -> NapiResult<TaxBracketTable> {
    let rows: Vec<TaxBracket> = serde_json::from_str(brackets_json).map_err(to_napi_error)?;
    TaxBracketTable::new(rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_buy_vs_rent(scenario_json: String, brackets_json: String) -> NapiResult<String> {
    let input: hearth_core::buy_vs_rent::ScenarioInput =
        serde_json::from_str(&scenario_json).map_err(to_napi_error)?;
    let table = parse_bracket_table(&brackets_json)?;
    let output =
        hearth_core::buy_vs_rent::project_buy_vs_rent(&input, &table).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_tax(income: String, jurisdiction: String, brackets_json: String) -> NapiResult<String> {
    let income: rust_decimal::Decimal = income.parse().map_err(to_napi_error)?;
    let table = parse_bracket_table(&brackets_json)?;
    let tax = hearth_core::tax::brackets::compute_tax(income, &jurisdiction, &table);
    serde_json::to_string(&tax).map_err(to_napi_error)
}

#[napi]
pub fn post_tax_income(input_json: String, brackets_json: String) -> NapiResult<String> {
    let input: hearth_core::tax::income::PostTaxIncomeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = parse_bracket_table(&brackets_json)?;
    let output = hearth_core::tax::income::post_tax_income(&input, &table).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cash allocation
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_cash_allocation(input_json: String) -> NapiResult<String> {
    let input: hearth_core::cash_allocation::CashAllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = hearth_core::cash_allocation::compute_cash_allocation(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage_schedule(input_json: String) -> NapiResult<String> {
    let terms: hearth_core::mortgage::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let summary = serde_json::json!({
        "monthly_payment": terms.monthly_payment(),
        "annual_debt_service": terms.annual_debt_service(),
        "periods": terms.periods(),
    });
    serde_json::to_string(&summary).map_err(to_napi_error)
}
