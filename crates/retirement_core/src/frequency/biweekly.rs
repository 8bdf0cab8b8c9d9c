use jiff::civil::Date;
use rust_decimal::Decimal;

use super::Frequency;
use crate::date_math::{add_days, days_between, days_inclusive};
use crate::model::Period;
use crate::money::{PORTION_SCALE, div_round};

pub(super) const PERIODS_PER_YEAR: u32 = 26;

const CYCLE_DAYS: i32 = 14;

/// Fixed 14-day cycles counted from `first_period_start`.
///
/// Payments keep the distance between the first cycle start and the first
/// payment date, so they land on the same weekday every cycle. Cycles that
/// do not overlap the accrual window are skipped; the ones that do are
/// clamped to it.
pub(super) fn periods(f: &Frequency, first_period_start: Date) -> Vec<Period> {
    let payment_offset = days_between(first_period_start, f.first_payment_date);

    let mut cycle_start = first_period_start;
    let lead = days_between(cycle_start, f.accrue_start);
    if lead >= CYCLE_DAYS {
        cycle_start = add_days(cycle_start, (lead / CYCLE_DAYS) * CYCLE_DAYS);
    }

    let mut result = Vec::new();
    while cycle_start <= f.accrue_end {
        let cycle_end = add_days(cycle_start, CYCLE_DAYS - 1);
        if cycle_end >= f.accrue_start {
            let start = cycle_start.max(f.accrue_start);
            let end = cycle_end.min(f.accrue_end);
            let fraction = div_round(
                Decimal::from(days_inclusive(start, end)),
                Decimal::from(CYCLE_DAYS),
                PORTION_SCALE,
            );
            let portion = div_round(fraction, Decimal::from(PERIODS_PER_YEAR), PORTION_SCALE);
            result.push(Period::new(
                start,
                end,
                add_days(cycle_start, payment_offset),
                portion,
            ));
        }
        cycle_start = add_days(cycle_start, CYCLE_DAYS);
    }
    result
}
