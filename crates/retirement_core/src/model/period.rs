//! Accrual/payment periods produced by a frequency.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date_math::days_inclusive;

/// One accrual window and the date it is paid.
///
/// `portion` is the fraction of an annualized amount that belongs to this
/// period. Vesting schedules author it directly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub accrual_start: Date,
    pub accrual_end: Date,
    pub payment_date: Date,
    pub portion: Decimal,
}

impl Period {
    pub fn new(accrual_start: Date, accrual_end: Date, payment_date: Date, portion: Decimal) -> Self {
        Self {
            accrual_start,
            accrual_end,
            payment_date,
            portion,
        }
    }

    pub fn accrual_days(&self) -> i32 {
        days_inclusive(self.accrual_start, self.accrual_end)
    }

    /// Calendar year the period accrues into (the year of its accrual end).
    pub fn accrual_year(&self) -> i16 {
        self.accrual_end.year()
    }
}
