use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use hearth_core::tax::brackets::{TaxBracket, TaxBracketTable};

/// One row of the bracket CSV. A blank upper bound marks the top bracket.
#[derive(Debug, Deserialize)]
struct BracketRow {
    #[serde(rename = "Jurisdiction")]
    jurisdiction: String,
    #[serde(rename = "Lower Bound")]
    lower_bound: Decimal,
    #[serde(rename = "Upper Bound")]
    upper_bound: Option<Decimal>,
    #[serde(rename = "Rate")]
    rate: Decimal,
}

/// Load a marginal bracket table from a CSV with columns
/// `Jurisdiction, Lower Bound, Upper Bound, Rate`.
pub fn load_bracket_table(path: &str) -> Result<TaxBracketTable, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let file = File::open(p)
        .map_err(|e| format!("Failed to open bracket file '{}': {}", p.display(), e))?;

    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for record in reader.deserialize::<BracketRow>() {
        let row = record
            .map_err(|e| format!("Malformed row in '{}': {}", p.display(), e))?;
        rows.push(TaxBracket {
            jurisdiction: row.jurisdiction,
            lower_bound: row.lower_bound,
            upper_bound: row.upper_bound,
            rate: row.rate,
        });
    }

    let table = TaxBracketTable::new(rows)
        .map_err(|e| format!("Invalid bracket table '{}': {}", p.display(), e))?;
    Ok(table)
}
