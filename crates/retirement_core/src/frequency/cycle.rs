use jiff::civil::Date;

use super::Frequency;
use crate::date_math::{add_days, add_months_sticky, days_inclusive};
use crate::model::Period;
use crate::money::two_stage_portion;

/// Shape of a fixed multi-month cycle.
#[derive(Debug, Clone, Copy)]
pub(super) struct CycleShape {
    pub months: i32,
    pub periods_per_year: u32,
}

pub(super) const SEMI_ANNUAL: CycleShape = CycleShape {
    months: 6,
    periods_per_year: 2,
};

pub(super) const QUARTERLY: CycleShape = CycleShape {
    months: 3,
    periods_per_year: 4,
};

/// Cycles of `shape.months` months whose ends are anchored on
/// `first_accrual_end`.
///
/// Cycle `k` nominally ends `k * months` after the anchor and starts the day
/// after cycle `k - 1` ends. The first cycle starts at the accrual start and
/// the last one is clamped to the accrual end, so both may be pro-rated
/// against the length of their nominal cycle.
pub(super) fn periods(f: &Frequency, first_accrual_end: Date, shape: CycleShape) -> Vec<Period> {
    let mut result = Vec::new();
    let mut start = f.accrue_start;
    let mut nominal_start = add_days(add_months_sticky(first_accrual_end, -shape.months), 1);
    let mut k = 0;

    while start <= f.accrue_end {
        let nominal_end = add_months_sticky(first_accrual_end, k * shape.months);
        let end = nominal_end.min(f.accrue_end);
        let payment = add_months_sticky(f.first_payment_date, k * shape.months);
        let portion = two_stage_portion(
            days_inclusive(start, end),
            days_inclusive(nominal_start, nominal_end),
            shape.periods_per_year,
        );
        result.push(Period::new(start, end, payment, portion));

        start = add_days(nominal_end, 1);
        nominal_start = start;
        k += 1;
    }
    result
}
