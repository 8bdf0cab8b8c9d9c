//! Balance snapshots
//!
//! A balance is a dated value. Cash balances are a scalar; share balances
//! are a unit count priced at the most recent unit price. Both are advanced
//! by applying changes in chronological order, rounding at every step.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SecurityId;
use crate::error::ComputeResult;
use crate::money::{checked_add, checked_mul, round_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashBalance {
    pub date: Date,
    pub value: Decimal,
}

impl CashBalance {
    pub fn new(date: Date, value: Decimal) -> Self {
        Self { date, value }
    }

    pub fn zero(date: Date) -> Self {
        Self::new(date, Decimal::ZERO)
    }

    /// Add a signed amount, rounding the result to cents.
    #[must_use]
    pub fn apply_change(&self, date: Date, amount: Decimal) -> Self {
        Self::new(date, round_cents(self.value + amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBalance {
    pub date: Date,
    pub shares: Decimal,
    pub share_price: Decimal,
    pub security: SecurityId,
}

impl ShareBalance {
    pub fn new(date: Date, shares: Decimal, share_price: Decimal, security: SecurityId) -> Self {
        Self {
            date,
            shares,
            share_price,
            security,
        }
    }

    pub fn value(&self) -> Decimal {
        round_cents(self.shares * self.share_price)
    }

    /// Units times price, or an overflow error when the value does not fit.
    pub fn checked_value(&self) -> ComputeResult<Decimal> {
        checked_mul(self.shares, self.share_price).map(round_cents)
    }

    /// Add the change's units (rounded to 2 places) and take its price.
    pub fn apply_change(&self, change: &ShareBalance) -> ComputeResult<Self> {
        Ok(Self {
            date: change.date,
            shares: round_cents(checked_add(self.shares, change.shares)?),
            share_price: change.share_price,
            security: change.security.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Balance {
    Cash(CashBalance),
    Share(ShareBalance),
}

impl Balance {
    pub fn date(&self) -> Date {
        match self {
            Balance::Cash(b) => b.date,
            Balance::Share(b) => b.date,
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            Balance::Cash(b) => b.value,
            Balance::Share(b) => b.value(),
        }
    }
}

impl From<CashBalance> for Balance {
    fn from(b: CashBalance) -> Self {
        Balance::Cash(b)
    }
}

impl From<ShareBalance> for Balance {
    fn from(b: ShareBalance) -> Self {
        Balance::Share(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_balance_rounds_each_step() {
        let b = CashBalance::zero(date(2015, 1, 1))
            .apply_change(date(2015, 1, 15), dec!(0.005))
            .apply_change(date(2015, 2, 15), dec!(0.005));
        // Each step rounds half-up: 0.01, then 0.015 -> 0.02
        assert_eq!(b.value, dec!(0.02));
        assert_eq!(b.date, date(2015, 2, 15));
    }

    #[test]
    fn test_share_balance_takes_latest_price() {
        let goog = SecurityId::from("GOOG");
        let start = ShareBalance::new(date(2015, 1, 1), dec!(10), dec!(500), goog.clone());
        let vest = ShareBalance::new(date(2015, 4, 1), dec!(2.125), dec!(550), goog);
        let after = start.apply_change(&vest).unwrap();
        assert_eq!(after.shares, dec!(12.13));
        assert_eq!(after.share_price, dec!(550));
        assert_eq!(after.checked_value(), Ok(dec!(6671.50)));
        assert_eq!(Balance::from(after).value(), dec!(6671.50));
    }
}
