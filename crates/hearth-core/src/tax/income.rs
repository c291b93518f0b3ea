use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::tax::brackets::{compute_tax, TaxBracketTable, FEDERAL, NJ};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HearthResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTaxIncomeInput {
    pub taxable_income: Money,
    /// Carried for parity with the projector's scenario input. The flag
    /// governs only the mortgage-interest deduction cap there; it does not
    /// change this calculation.
    #[serde(default)]
    pub assume_tax_cuts_expire: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTaxIncomeResult {
    pub post_tax_income: Money,
    pub federal_tax: Money,
    pub nj_tax: Money,
    pub monthly_net_income: Money,
}

/// Net income after federal and NJ tax, used as the budgeting denominator
/// for the first-year expense view.
pub fn post_tax_income(
    input: &PostTaxIncomeInput,
    table: &TaxBracketTable,
) -> HearthResult<ComputationOutput<PostTaxIncomeResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for jurisdiction in [FEDERAL, NJ] {
        if !table.has_jurisdiction(jurisdiction) {
            warnings.push(format!(
                "No brackets for jurisdiction '{jurisdiction}' — treating its tax as zero"
            ));
        }
    }

    let federal_tax = compute_tax(input.taxable_income, FEDERAL, table);
    let nj_tax = compute_tax(input.taxable_income, NJ, table);
    let net = input.taxable_income - federal_tax - nj_tax;

    let result = PostTaxIncomeResult {
        post_tax_income: net,
        federal_tax,
        nj_tax,
        monthly_net_income: net / dec!(12),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Post-Tax Income (Federal + NJ marginal brackets)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::brackets::TaxBracket;
    use rust_decimal_macros::dec;

    fn table() -> TaxBracketTable {
        TaxBracketTable::new(vec![
            TaxBracket {
                jurisdiction: FEDERAL.into(),
                lower_bound: dec!(0),
                upper_bound: None,
                rate: dec!(0.20),
            },
            TaxBracket {
                jurisdiction: NJ.into(),
                lower_bound: dec!(0),
                upper_bound: None,
                rate: dec!(0.05),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_post_tax_income_subtracts_federal_and_nj() {
        let input = PostTaxIncomeInput {
            taxable_income: dec!(100000),
            assume_tax_cuts_expire: true,
        };
        let out = post_tax_income(&input, &table()).unwrap();
        assert_eq!(out.result.federal_tax, dec!(20000));
        assert_eq!(out.result.nj_tax, dec!(5000));
        assert_eq!(out.result.post_tax_income, dec!(75000));
        assert_eq!(out.result.monthly_net_income, dec!(6250));
    }

    #[test]
    fn test_expire_flag_does_not_change_result() {
        let table = table();
        let with_flag = post_tax_income(
            &PostTaxIncomeInput {
                taxable_income: dec!(250000),
                assume_tax_cuts_expire: true,
            },
            &table,
        )
        .unwrap();
        let without_flag = post_tax_income(
            &PostTaxIncomeInput {
                taxable_income: dec!(250000),
                assume_tax_cuts_expire: false,
            },
            &table,
        )
        .unwrap();
        assert_eq!(
            with_flag.result.post_tax_income,
            without_flag.result.post_tax_income
        );
    }

    #[test]
    fn test_missing_jurisdiction_warns() {
        let table = TaxBracketTable::new(vec![TaxBracket {
            jurisdiction: FEDERAL.into(),
            lower_bound: dec!(0),
            upper_bound: None,
            rate: dec!(0.20),
        }])
        .unwrap();
        let out = post_tax_income(
            &PostTaxIncomeInput {
                taxable_income: dec!(100000),
                assume_tax_cuts_expire: false,
            },
            &table,
        )
        .unwrap();
        assert_eq!(out.result.nj_tax, dec!(0));
        assert!(out.warnings.iter().any(|w| w.contains("NJ")));
    }
}
