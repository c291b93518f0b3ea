use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cash_allocation::CashAllocationSummary;
use crate::error::HearthError;
use crate::mortgage::LoanTerms;
use crate::tax::brackets::{compute_tax, TaxBracketTable, FEDERAL, NJ, NYC, NY_STATE};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HearthResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every parameter of a buy-vs-rent evaluation. Built once per call and
/// never mutated mid-computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub purchase_price: Money,
    /// Annual mortgage rate as a decimal fraction.
    pub mortgage_rate: Rate,
    pub loan_term_years: u32,
    /// Annual maintenance as a fraction of home value.
    pub maintenance_rate: Rate,
    /// Annual property tax as a fraction of home value.
    pub property_tax_rate: Rate,
    pub hoa_annual: Money,
    pub home_insurance_annual: Money,
    pub initial_monthly_rent: Money,
    pub rent_growth: Rate,
    pub renter_insurance_annual: Money,
    pub home_price_growth: Rate,
    /// Buy-side closing costs as a fraction of the purchase price.
    pub closing_cost_rate: Rate,
    /// Selling costs as a fraction of the exit sale price.
    pub selling_cost_rate: Rate,
    /// Principal cap on deductible mortgage interest.
    pub mortgage_deduction_cap: Money,
    pub broker_fee_months: u32,
    pub security_deposit_months: u32,
    /// Fraction of the security deposit returned at lease end.
    pub deposit_return: Rate,
    pub holding_period_years: u32,
    /// Annual return the initial outlays would otherwise earn.
    pub investment_return: Rate,
    /// When true, deductible interest is half the capped annual interest;
    /// when false the deduction is zero.
    pub assume_tax_cuts_expire: bool,
    pub taxable_income: Money,
    pub cash_allocation: CashAllocationSummary,
}

/// One row of the Buy-vs-Rent comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub buy: Money,
    pub rent: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyCost {
    pub year: u32,
    pub buy_cost: Money,
    pub rent_cost: Money,
}

/// Buy-path monthly series. The home value here compounds monthly at
/// `(1 + home_price_growth)^(1/12) - 1` from the purchase price; it is a
/// finer-grained series derived independently of the yearly path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub month: u32,
    pub mortgage_payment: Money,
    pub insurance: Money,
    pub property_tax: Money,
    pub home_value: Money,
    pub total_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstYearExpenses {
    pub mortgage_payments: Money,
    pub property_taxes: Money,
    pub maintenance: Money,
    pub hoa: Money,
    pub home_insurance: Money,
    pub total_recurring: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSavingsSummary {
    pub federal: Money,
    pub state_local: Money,
    pub combined: Money,
    /// Federal + NJ + NYC liability at the scenario income, before any
    /// deduction. A budgeting reference, not part of either total.
    pub total_estimated_taxes: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub comparison: Vec<ComparisonRow>,
    pub yearly_costs: Vec<YearlyCost>,
    pub monthly_breakdown: Vec<MonthlyCost>,
    pub buy_total: Money,
    pub rent_total: Money,
    pub net_proceeds: Money,
    pub loan_amount: Money,
    pub monthly_mortgage_payment: Money,
    pub first_year_expenses: FirstYearExpenses,
    pub tax_savings: TaxSavingsSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the total cost of buying versus renting the same property over
/// the holding period.
///
/// Both paths accumulate nominal-dollar costs: initial outlay, recurring
/// costs, and the compounding investment return foregone on the initial
/// outlay. The buy path is credited with net sale proceeds at exit and with
/// marginal tax savings from the mortgage-interest deduction and the
/// NY-to-NJ state/local differential.
pub fn project_buy_vs_rent(
    input: &ScenarioInput,
    table: &TaxBracketTable,
) -> HearthResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    collect_warnings(input, table, &mut warnings);

    let years = input.holding_period_years as usize;
    let down_payment = input.cash_allocation.down_payment;
    let loan_amount = input.purchase_price - down_payment;
    let initial_buy_cost = down_payment + input.closing_cost_rate * input.purchase_price;
    let initial_rent_cost = Decimal::from(input.broker_fee_months) * input.initial_monthly_rent
        + Decimal::from(input.security_deposit_months)
            * input.initial_monthly_rent
            * (Decimal::ONE - input.deposit_return);

    let loan = LoanTerms {
        loan_amount,
        annual_rate: input.mortgage_rate,
        term_years: input.loan_term_years,
    };
    let monthly_mortgage_payment = loan.monthly_payment();

    // Yearly home value path, index 0 = purchase year.
    let mut home_value = Vec::with_capacity(years + 1);
    let mut value = input.purchase_price;
    home_value.push(value);
    for _ in 0..years {
        value *= Decimal::ONE + input.home_price_growth;
        home_value.push(value);
    }

    let net_sale_price = home_value[years] * (Decimal::ONE - input.selling_cost_rate);
    let remaining_balance = loan.remaining_balance(input.holding_period_years * 12);
    let net_proceeds = net_sale_price - remaining_balance;

    // Rent path, one entry per holding year.
    let mut rent = Vec::with_capacity(years);
    let mut current_rent = input.initial_monthly_rent;
    for _ in 0..years {
        rent.push(current_rent);
        current_rent *= Decimal::ONE + input.rent_growth;
    }
    let rent_costs: Vec<Money> = rent
        .iter()
        .map(|r| r * dec!(12) + input.renter_insurance_annual)
        .collect();

    // Recurring buy costs, 1-indexed against the home value path.
    let property_taxes: Vec<Money> = (1..=years)
        .map(|i| home_value[i] * input.property_tax_rate)
        .collect();
    let maintenance_costs: Vec<Money> = (1..=years)
        .map(|i| home_value[i] * input.maintenance_rate)
        .collect();
    let annual_mortgage = monthly_mortgage_payment * dec!(12);

    // Deductible interest per year. The deduction only exists under the
    // expiry flag: half the actual interest, capped at cap * mortgage_rate.
    let deduction_ceiling = input.mortgage_deduction_cap * input.mortgage_rate;
    let deductible_interest: Vec<Money> = (0..input.holding_period_years)
        .map(|year| {
            if input.assume_tax_cuts_expire {
                dec!(0.5) * loan.annual_interest(year).min(deduction_ceiling)
            } else {
                Decimal::ZERO
            }
        })
        .collect();

    let base_federal_tax = compute_tax(input.taxable_income, FEDERAL, table);
    let federal_tax_savings: Vec<Money> = deductible_interest
        .iter()
        .map(|d| base_federal_tax - compute_tax(input.taxable_income - d, FEDERAL, table))
        .collect();

    let ny_tax = compute_tax(input.taxable_income, NY_STATE, table)
        + compute_tax(input.taxable_income, NYC, table);
    let nj_tax = compute_tax(input.taxable_income, NJ, table);
    let state_local_tax_saving = ny_tax - nj_tax;

    // Opportunity cost: the marginal compounding gain the initial outlay
    // would have earned in year i, not the cumulative total.
    let growth = Decimal::ONE + input.investment_return;
    let mut buy_opp_cost = Vec::with_capacity(years);
    let mut rent_opp_cost = Vec::with_capacity(years);
    let mut pow = Decimal::ONE;
    for _ in 0..years {
        let next = pow * growth;
        buy_opp_cost.push(initial_buy_cost * (next - pow));
        rent_opp_cost.push(initial_rent_cost * (next - pow));
        pow = next;
    }

    let sum = |v: &[Money]| v.iter().copied().sum::<Decimal>();
    let total_federal_savings = sum(&federal_tax_savings);
    let total_state_local_savings = state_local_tax_saving * Decimal::from(input.holding_period_years);
    let total_recurring_buy = annual_mortgage * Decimal::from(input.holding_period_years)
        + sum(&property_taxes)
        + sum(&maintenance_costs)
        + (input.hoa_annual + input.home_insurance_annual)
            * Decimal::from(input.holding_period_years);

    let buy_total = initial_buy_cost + total_recurring_buy + sum(&buy_opp_cost)
        - total_federal_savings
        - total_state_local_savings
        - net_proceeds;
    let rent_total = initial_rent_cost + sum(&rent_costs) + sum(&rent_opp_cost);

    let comparison = vec![
        ComparisonRow {
            label: "Initial costs".into(),
            buy: initial_buy_cost,
            rent: initial_rent_cost,
        },
        ComparisonRow {
            label: "Recurring costs".into(),
            buy: total_recurring_buy - total_federal_savings - total_state_local_savings,
            rent: sum(&rent_costs),
        },
        ComparisonRow {
            label: "Opportunity costs".into(),
            buy: sum(&buy_opp_cost),
            rent: sum(&rent_opp_cost),
        },
        ComparisonRow {
            label: "Net proceeds".into(),
            buy: -net_proceeds,
            rent: -initial_rent_cost * input.deposit_return,
        },
        ComparisonRow {
            label: "Total".into(),
            buy: buy_total,
            rent: rent_total,
        },
    ];

    let yearly_costs: Vec<YearlyCost> = (0..years)
        .map(|y| YearlyCost {
            year: y as u32 + 1,
            buy_cost: annual_mortgage + property_taxes[y] + maintenance_costs[y]
                + input.hoa_annual
                + input.home_insurance_annual
                - federal_tax_savings[y]
                - state_local_tax_saving,
            rent_cost: rent_costs[y],
        })
        .collect();

    let monthly_breakdown = build_monthly_breakdown(input, monthly_mortgage_payment, &home_value);

    let first_year_expenses = if years > 0 {
        let total_recurring = annual_mortgage
            + property_taxes[0]
            + maintenance_costs[0]
            + input.hoa_annual
            + input.home_insurance_annual;
        FirstYearExpenses {
            mortgage_payments: annual_mortgage,
            property_taxes: property_taxes[0],
            maintenance: maintenance_costs[0],
            hoa: input.hoa_annual,
            home_insurance: input.home_insurance_annual,
            total_recurring,
        }
    } else {
        FirstYearExpenses {
            mortgage_payments: Decimal::ZERO,
            property_taxes: Decimal::ZERO,
            maintenance: Decimal::ZERO,
            hoa: Decimal::ZERO,
            home_insurance: Decimal::ZERO,
            total_recurring: Decimal::ZERO,
        }
    };

    let tax_savings = TaxSavingsSummary {
        federal: total_federal_savings,
        state_local: total_state_local_savings,
        combined: total_federal_savings + total_state_local_savings,
        total_estimated_taxes: base_federal_tax
            + nj_tax
            + compute_tax(input.taxable_income, NYC, table),
    };

    let result = ProjectionResult {
        comparison,
        yearly_costs,
        monthly_breakdown,
        buy_total,
        rent_total,
        net_proceeds,
        loan_amount,
        monthly_mortgage_payment,
        first_year_expenses,
        tax_savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy vs Rent Projection (nominal costs with opportunity cost)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ScenarioInput) -> HearthResult<()> {
    if input.purchase_price < Decimal::ZERO {
        return Err(HearthError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price cannot be negative".into(),
        });
    }
    if input.initial_monthly_rent < Decimal::ZERO {
        return Err(HearthError::InvalidInput {
            field: "initial_monthly_rent".into(),
            reason: "Initial rent cannot be negative".into(),
        });
    }
    if input.deposit_return < Decimal::ZERO || input.deposit_return > Decimal::ONE {
        return Err(HearthError::InvalidInput {
            field: "deposit_return".into(),
            reason: "Deposit return must be a fraction in [0, 1]".into(),
        });
    }
    Ok(())
}

fn collect_warnings(input: &ScenarioInput, table: &TaxBracketTable, warnings: &mut Vec<String>) {
    for jurisdiction in [FEDERAL, NY_STATE, NYC, NJ] {
        if !table.has_jurisdiction(jurisdiction) {
            warnings.push(format!(
                "No brackets for jurisdiction '{jurisdiction}' — treating its tax as zero"
            ));
        }
    }
    if input.cash_allocation.down_payment < Decimal::ZERO {
        warnings.push(format!(
            "Down payment {} is negative — available cash does not cover reserves",
            input.cash_allocation.down_payment
        ));
    }
    if input.holding_period_years > input.loan_term_years {
        warnings.push(format!(
            "Holding period {}y exceeds loan term {}y — mortgage payments are modelled for every holding year",
            input.holding_period_years, input.loan_term_years
        ));
    }
}

// ---------------------------------------------------------------------------
// Monthly breakdown
// ---------------------------------------------------------------------------

fn build_monthly_breakdown(
    input: &ScenarioInput,
    monthly_mortgage_payment: Money,
    home_value: &[Money],
) -> Vec<MonthlyCost> {
    let n_months = input.holding_period_years * 12;
    if n_months == 0 {
        return Vec::new();
    }

    let monthly_insurance = input.home_insurance_annual / dec!(12);
    let monthly_growth_rate =
        (Decimal::ONE + input.home_price_growth).powd(Decimal::ONE / dec!(12)) - Decimal::ONE;

    let mut breakdown = Vec::with_capacity(n_months as usize);
    let mut monthly_home_value = input.purchase_price;
    for month in 1..=n_months {
        // Property tax accrues against the next year's home value, spread
        // evenly across the year's twelve months.
        let year = ((month - 1) / 12) as usize;
        let property_tax = home_value[year + 1] * input.property_tax_rate / dec!(12);

        breakdown.push(MonthlyCost {
            month,
            mortgage_payment: monthly_mortgage_payment,
            insurance: monthly_insurance,
            property_tax,
            home_value: monthly_home_value,
            total_cost: monthly_mortgage_payment + monthly_insurance + property_tax,
        });
        monthly_home_value *= Decimal::ONE + monthly_growth_rate;
    }
    breakdown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash_allocation::{compute_cash_allocation, CashAllocationInput, CashSource};
    use crate::tax::brackets::TaxBracket;
    use rust_decimal_macros::dec;

    fn table() -> TaxBracketTable {
        TaxBracketTable::new(vec![
            TaxBracket {
                jurisdiction: FEDERAL.into(),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(100000)),
                rate: dec!(0.20),
            },
            TaxBracket {
                jurisdiction: FEDERAL.into(),
                lower_bound: dec!(100000),
                upper_bound: None,
                rate: dec!(0.35),
            },
            TaxBracket {
                jurisdiction: NY_STATE.into(),
                lower_bound: dec!(0),
                upper_bound: None,
                rate: dec!(0.06),
            },
            TaxBracket {
                jurisdiction: NYC.into(),
                lower_bound: dec!(0),
                upper_bound: None,
                rate: dec!(0.038),
            },
            TaxBracket {
                jurisdiction: NJ.into(),
                lower_bound: dec!(0),
                upper_bound: None,
                rate: dec!(0.055),
            },
        ])
        .unwrap()
    }

    fn scenario() -> ScenarioInput {
        let cash_allocation = compute_cash_allocation(&CashAllocationInput {
            purchase_price: dec!(1000000),
            closing_cost_rate: dec!(0.03),
            discretionary_budget: dec!(30000),
            safety_margin: dec!(50000),
            cash_sources: vec![
                CashSource {
                    label: "user".into(),
                    amount: dec!(470000),
                },
                CashSource {
                    label: "partner".into(),
                    amount: dec!(150000),
                },
                CashSource {
                    label: "family".into(),
                    amount: dec!(100000),
                },
            ],
        });
        ScenarioInput {
            purchase_price: dec!(1000000),
            mortgage_rate: dec!(0.0575),
            loan_term_years: 15,
            maintenance_rate: dec!(0.01),
            property_tax_rate: dec!(0.016),
            hoa_annual: dec!(0),
            home_insurance_annual: dec!(2900),
            initial_monthly_rent: dec!(5500),
            rent_growth: dec!(0.03),
            renter_insurance_annual: dec!(150),
            home_price_growth: dec!(0.03),
            closing_cost_rate: dec!(0.03),
            selling_cost_rate: dec!(0.05),
            mortgage_deduction_cap: dec!(750000),
            broker_fee_months: 1,
            security_deposit_months: 1,
            deposit_return: dec!(1.0),
            holding_period_years: 10,
            investment_return: dec!(0.045),
            assume_tax_cuts_expire: true,
            taxable_income: dec!(500000),
            cash_allocation,
        }
    }

    #[test]
    fn test_loan_amount_is_price_minus_down_payment() {
        let input = scenario();
        let out = project_buy_vs_rent(&input, &table()).unwrap();
        assert_eq!(
            out.result.loan_amount,
            input.purchase_price - input.cash_allocation.down_payment
        );
    }

    #[test]
    fn test_totals_are_positive_for_reference_scenario() {
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        assert!(out.result.buy_total > Decimal::ZERO);
        assert!(out.result.rent_total > Decimal::ZERO);
    }

    #[test]
    fn test_yearly_rent_costs_strictly_increase() {
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        assert_eq!(out.result.yearly_costs.len(), 10);
        for pair in out.result.yearly_costs.windows(2) {
            assert!(pair[1].rent_cost > pair[0].rent_cost);
        }
    }

    #[test]
    fn test_comparison_totals_match_aggregates() {
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        let total_row = out
            .result
            .comparison
            .iter()
            .find(|r| r.label == "Total")
            .unwrap();
        assert_eq!(total_row.buy, out.result.buy_total);
        assert_eq!(total_row.rent, out.result.rent_total);
    }

    #[test]
    fn test_comparison_rows_sum_to_totals() {
        // Initial + recurring + opportunity + net-proceeds adjustment must
        // reproduce buy_total; the rent deposit row is informational only.
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        let row = |label: &str| {
            out.result
                .comparison
                .iter()
                .find(|r| r.label == label)
                .unwrap()
        };
        let buy_sum = row("Initial costs").buy
            + row("Recurring costs").buy
            + row("Opportunity costs").buy
            + row("Net proceeds").buy;
        assert!((buy_sum - out.result.buy_total).abs() < dec!(0.0001));
    }

    #[test]
    fn test_no_deduction_when_flag_is_false() {
        let mut input = scenario();
        input.assume_tax_cuts_expire = false;
        let out = project_buy_vs_rent(&input, &table()).unwrap();
        assert_eq!(out.result.tax_savings.federal, Decimal::ZERO);
    }

    #[test]
    fn test_federal_savings_positive_when_flag_is_set() {
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        assert!(out.result.tax_savings.federal > Decimal::ZERO);
    }

    #[test]
    fn test_state_local_savings_constant_per_year() {
        let input = scenario();
        let table = table();
        let out = project_buy_vs_rent(&input, &table).unwrap();
        let per_year = (compute_tax(input.taxable_income, NY_STATE, &table)
            + compute_tax(input.taxable_income, NYC, &table))
            - compute_tax(input.taxable_income, NJ, &table);
        assert_eq!(out.result.tax_savings.state_local, per_year * dec!(10));
    }

    #[test]
    fn test_monthly_breakdown_shape() {
        let out = project_buy_vs_rent(&scenario(), &table()).unwrap();
        let monthly = &out.result.monthly_breakdown;
        assert_eq!(monthly.len(), 120);
        assert_eq!(monthly[0].home_value, dec!(1000000));
        // The monthly series compounds at the equivalent monthly rate, so
        // after 12 months it should sit near the yearly path's year-1 value.
        let after_year = monthly[12].home_value;
        assert!((after_year - dec!(1030000)).abs() < dec!(100));
        assert_eq!(
            monthly[0].total_cost,
            monthly[0].mortgage_payment + monthly[0].insurance + monthly[0].property_tax
        );
    }

    #[test]
    fn test_monthly_property_tax_uses_year_ahead_value() {
        let input = scenario();
        let out = project_buy_vs_rent(&input, &table()).unwrap();
        let expected =
            input.purchase_price * (Decimal::ONE + input.home_price_growth) * input.property_tax_rate
                / dec!(12);
        assert!((out.result.monthly_breakdown[0].property_tax - expected).abs() < dec!(0.0001));
    }

    #[test]
    fn test_zero_holding_period_is_degenerate_not_an_error() {
        let mut input = scenario();
        input.holding_period_years = 0;
        let out = project_buy_vs_rent(&input, &table()).unwrap();
        assert!(out.result.yearly_costs.is_empty());
        assert!(out.result.monthly_breakdown.is_empty());
        assert_eq!(out.result.first_year_expenses.total_recurring, dec!(0));
    }

    #[test]
    fn test_unknown_jurisdiction_produces_warning_not_error() {
        let table = TaxBracketTable::new(vec![TaxBracket {
            jurisdiction: FEDERAL.into(),
            lower_bound: dec!(0),
            upper_bound: None,
            rate: dec!(0.2),
        }])
        .unwrap();
        let out = project_buy_vs_rent(&scenario(), &table).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("NY State")));
        assert_eq!(out.result.tax_savings.state_local, dec!(0));
    }

    #[test]
    fn test_negative_down_payment_warns() {
        let mut input = scenario();
        input.cash_allocation.down_payment = dec!(-5000);
        let out = project_buy_vs_rent(&input, &table()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("negative")));
        // A negative down payment inflates the loan beyond the price.
        assert!(out.result.loan_amount > input.purchase_price);
    }
}
