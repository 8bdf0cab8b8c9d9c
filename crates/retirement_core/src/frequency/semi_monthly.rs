use jiff::civil::Date;

use super::Frequency;
use crate::date_math::{add_months, date_clamped, days_in_month, days_inclusive, first_of_month};
use crate::model::Period;
use crate::money::two_stage_portion;

pub(super) const PERIODS_PER_YEAR: u32 = 24;

const MIDDLE_OF_MONTH: i8 = 15;

/// Two periods per month split after the 15th.
pub(super) fn periods(f: &Frequency, first_day: i8, second_day: i8) -> Vec<Period> {
    let mut result = Vec::new();
    let mut month = first_of_month(f.accrue_start);
    while month <= f.accrue_end {
        let (year, m) = (month.year(), month.month());
        let month_len = days_in_month(year, m);

        let first_start = month.max(f.accrue_start);
        let first_end = jiff::civil::date(year, m, MIDDLE_OF_MONTH).min(f.accrue_end);
        if first_start <= first_end {
            result.push(half_period(
                first_start,
                first_end,
                first_day,
                MIDDLE_OF_MONTH as i32,
            ));
        }

        let second_start = jiff::civil::date(year, m, MIDDLE_OF_MONTH + 1).max(f.accrue_start);
        let second_end = jiff::civil::date(year, m, month_len).min(f.accrue_end);
        if second_start <= second_end {
            result.push(half_period(
                second_start,
                second_end,
                second_day,
                (month_len - MIDDLE_OF_MONTH) as i32,
            ));
        }

        month = add_months(month, 1);
    }
    result
}

fn half_period(start: Date, end: Date, payment_day: i8, half_len: i32) -> Period {
    let mut payment = date_clamped(start.year(), start.month(), payment_day);
    if payment < end {
        let next = add_months(first_of_month(start), 1);
        payment = date_clamped(next.year(), next.month(), payment_day);
    }
    let portion = two_stage_portion(days_inclusive(start, end), half_len, PERIODS_PER_YEAR);
    Period::new(start, end, payment, portion)
}
