use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::types::{Money, Rate};
use crate::HearthResult;

/// Jurisdiction names the buy-vs-rent projector looks up.
pub const FEDERAL: &str = "Federal";
pub const NY_STATE: &str = "NY State";
pub const NYC: &str = "NYC";
pub const NJ: &str = "NJ";

/// A single marginal bracket: income between the bounds is taxed at `rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    pub jurisdiction: String,
    pub lower_bound: Money,
    /// `None` marks the top bracket (unbounded upper end).
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

/// Immutable marginal-bracket table covering one or more jurisdictions.
///
/// Within a jurisdiction the brackets partition income into contiguous,
/// ascending ranges starting at zero. The constructor enforces this; the
/// table is never mutated afterwards, so it is safe to share across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Build a table from raw rows, sorting per jurisdiction by lower bound
    /// and validating the partition invariants.
    pub fn new(mut rows: Vec<TaxBracket>) -> HearthResult<Self> {
        if rows.is_empty() {
            return Err(HearthError::InsufficientData(
                "Tax bracket table requires at least one bracket".into(),
            ));
        }

        rows.sort_by(|a, b| {
            a.jurisdiction
                .cmp(&b.jurisdiction)
                .then(a.lower_bound.cmp(&b.lower_bound))
        });

        for pair in rows.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.jurisdiction != next.jurisdiction {
                continue;
            }
            match prev.upper_bound {
                Some(upper) if upper == next.lower_bound => {}
                Some(upper) => {
                    return Err(HearthError::InvalidInput {
                        field: "brackets".into(),
                        reason: format!(
                            "{}: bracket ending at {} is not contiguous with bracket starting at {}",
                            prev.jurisdiction, upper, next.lower_bound
                        ),
                    });
                }
                None => {
                    return Err(HearthError::InvalidInput {
                        field: "brackets".into(),
                        reason: format!(
                            "{}: unbounded bracket at {} is not the last bracket",
                            prev.jurisdiction, prev.lower_bound
                        ),
                    });
                }
            }
        }

        for row in &rows {
            let is_first = rows
                .iter()
                .filter(|r| r.jurisdiction == row.jurisdiction)
                .map(|r| r.lower_bound)
                .min()
                == Some(row.lower_bound);
            if is_first && !row.lower_bound.is_zero() {
                return Err(HearthError::InvalidInput {
                    field: "brackets".into(),
                    reason: format!(
                        "{}: first bracket must start at 0, found {}",
                        row.jurisdiction, row.lower_bound
                    ),
                });
            }
            if let Some(upper) = row.upper_bound {
                if upper <= row.lower_bound {
                    return Err(HearthError::InvalidInput {
                        field: "brackets".into(),
                        reason: format!(
                            "{}: upper bound {} must exceed lower bound {}",
                            row.jurisdiction, upper, row.lower_bound
                        ),
                    });
                }
            }
            if row.rate < Decimal::ZERO || row.rate > Decimal::ONE {
                return Err(HearthError::InvalidInput {
                    field: "rate".into(),
                    reason: format!(
                        "{}: rate {} must be a decimal fraction in [0, 1]",
                        row.jurisdiction, row.rate
                    ),
                });
            }
        }

        Ok(Self { brackets: rows })
    }

    /// Brackets for one jurisdiction, ascending by lower bound.
    pub fn for_jurisdiction<'a>(
        &'a self,
        jurisdiction: &'a str,
    ) -> impl Iterator<Item = &'a TaxBracket> {
        self.brackets
            .iter()
            .filter(move |b| b.jurisdiction == jurisdiction)
    }

    pub fn has_jurisdiction(&self, jurisdiction: &str) -> bool {
        self.brackets.iter().any(|b| b.jurisdiction == jurisdiction)
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

/// Marginal tax liability for `income` in `jurisdiction`.
///
/// Accrues `(min(income, upper) - lower) * rate` for every bracket the income
/// reaches. Non-positive income and unknown jurisdictions both yield zero;
/// callers that want to distinguish "no tax" from "no data" should check
/// [`TaxBracketTable::has_jurisdiction`] first.
pub fn compute_tax(income: Money, jurisdiction: &str, table: &TaxBracketTable) -> Money {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for bracket in table.for_jurisdiction(jurisdiction) {
        if income <= bracket.lower_bound {
            break;
        }
        let taxed_to = bracket
            .upper_bound
            .map_or(income, |upper| income.min(upper));
        tax += (taxed_to - bracket.lower_bound) * bracket.rate;
    }
    tax
}
