use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Fixed-rate, level-payment mortgage terms.
///
/// All schedule quantities are closed forms over these three fields, so the
/// type is cheap to copy around and needs no precomputed schedule vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    /// Annual rate as a decimal fraction (0.0575 = 5.75%).
    pub annual_rate: Rate,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / dec!(12)
    }

    pub fn periods(&self) -> u32 {
        self.term_years * 12
    }

    /// Level payment that fully amortizes the loan over the term.
    ///
    /// Zero rate degenerates to straight-line principal; a zero-period term
    /// yields a zero payment rather than dividing by zero.
    pub fn monthly_payment(&self) -> Money {
        let n = self.periods();
        if n == 0 {
            return Decimal::ZERO;
        }
        let r = self.monthly_rate();
        if r.is_zero() {
            return self.loan_amount / Decimal::from(n);
        }
        let factor = (Decimal::ONE + r).powd(Decimal::from(n));
        self.loan_amount * r * factor / (factor - Decimal::ONE)
    }

    pub fn annual_debt_service(&self) -> Money {
        self.monthly_payment() * dec!(12)
    }

    /// Outstanding principal after `after_periods` payments, clamped at zero
    /// once the loan is repaid: `P(1+r)^k - pmt * ((1+r)^k - 1) / r`.
    pub fn remaining_balance(&self, after_periods: u32) -> Money {
        let n = self.periods();
        if n == 0 {
            return self.loan_amount;
        }
        let k = after_periods.min(n);
        let r = self.monthly_rate();
        if r.is_zero() {
            let paid = self.monthly_payment() * Decimal::from(k);
            return (self.loan_amount - paid).max(Decimal::ZERO);
        }
        let growth = (Decimal::ONE + r).powd(Decimal::from(k));
        let balance = self.loan_amount * growth - self.monthly_payment() * (growth - Decimal::ONE) / r;
        balance.max(Decimal::ZERO)
    }

    /// Interest portion of payment `month` (1-indexed): the balance after
    /// `month - 1` payments times the monthly rate.
    pub fn interest_for_month(&self, month: u32) -> Money {
        if month == 0 || month > self.periods() {
            return Decimal::ZERO;
        }
        self.remaining_balance(month - 1) * self.monthly_rate()
    }

    /// Interest paid across the 12 months of `year` (0-indexed).
    pub fn annual_interest(&self, year: u32) -> Money {
        let mut total = Decimal::ZERO;
        for month in (year * 12 + 1)..=(year * 12 + 12) {
            total += self.interest_for_month(month);
        }
        total
    }
}
