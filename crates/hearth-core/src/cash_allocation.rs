use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// A labelled pool of cash contributed toward the purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashSource {
    pub label: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAllocationInput {
    pub purchase_price: Money,
    /// Closing costs as a fraction of the purchase price.
    pub closing_cost_rate: Rate,
    /// Cash set aside for planned non-housing spending, e.g. a car purchase.
    pub discretionary_budget: Money,
    pub safety_margin: Money,
    pub cash_sources: Vec<CashSource>,
}

/// How pooled cash splits between reserves and the down payment.
///
/// `down_payment` may be negative: that signals insufficient funds and is
/// left for the caller to interpret, never rejected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAllocationSummary {
    pub total_available_funds: Money,
    pub estimated_closing_costs: Money,
    pub discretionary_budget: Money,
    pub safety_margin: Money,
    pub reserved_funds: Money,
    pub down_payment: Money,
}

/// Resolve the down payment left after reserving closing costs, the
/// discretionary budget, and the safety margin. Exact conservation holds:
/// `down_payment + reserved_funds == total_available_funds`.
pub fn compute_cash_allocation(input: &CashAllocationInput) -> CashAllocationSummary {
    let total_available_funds: Money = input
        .cash_sources
        .iter()
        .map(|s| s.amount)
        .sum::<Decimal>();

    let estimated_closing_costs = input.purchase_price * input.closing_cost_rate;
    let reserved_funds =
        estimated_closing_costs + input.discretionary_budget + input.safety_margin;
    let down_payment = total_available_funds - reserved_funds;

    CashAllocationSummary {
        total_available_funds,
        estimated_closing_costs,
        discretionary_budget: input.discretionary_budget,
        safety_margin: input.safety_margin,
        reserved_funds,
        down_payment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> CashAllocationInput {
        CashAllocationInput {
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
        }
    }

    #[test]
    fn test_down_payment_resolution() {
        let summary = compute_cash_allocation(&input());
        assert_eq!(summary.total_available_funds, dec!(720000));
        assert_eq!(summary.estimated_closing_costs, dec!(30000));
        assert_eq!(summary.reserved_funds, dec!(110000));
        assert_eq!(summary.down_payment, dec!(610000));
    }

    #[test]
    fn test_conservation_exact() {
        let summary = compute_cash_allocation(&input());
        assert_eq!(
            summary.down_payment + summary.reserved_funds,
            summary.total_available_funds
        );
    }

    #[test]
    fn test_negative_down_payment_is_valid_output() {
        let mut input = input();
        input.cash_sources = vec![CashSource {
            label: "user".into(),
            amount: dec!(50000),
        }];
        let summary = compute_cash_allocation(&input);
        assert_eq!(summary.down_payment, dec!(-60000));
        assert_eq!(
            summary.down_payment + summary.reserved_funds,
            summary.total_available_funds
        );
    }

    #[test]
    fn test_no_cash_sources() {
        let mut input = input();
        input.cash_sources.clear();
        let summary = compute_cash_allocation(&input);
        assert_eq!(summary.total_available_funds, dec!(0));
        assert_eq!(summary.down_payment, dec!(-110000));
    }
}
