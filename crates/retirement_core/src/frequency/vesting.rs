use jiff::civil::Date;

use super::{Frequency, Vesting};
use crate::date_math::{add_days, add_months};
use crate::model::Period;

/// Last accrual day of an entry vesting `months` after `schedule_start`.
pub(super) fn entry_end(schedule_start: Date, months: u32) -> Date {
    add_days(add_months(schedule_start, months as i32), -1)
}

/// One period per vesting entry, carrying the authored percent verbatim.
///
/// Each entry accrues from the day after the previous entry's end through
/// the day before its vesting date, and pays on the vesting date.
pub(super) fn periods(f: &Frequency, vesting: &[Vesting]) -> Vec<Period> {
    let mut start = f.accrue_start;
    vesting
        .iter()
        .map(|entry| {
            let end = entry_end(f.accrue_start, entry.months);
            let vest_date = add_days(end, 1);
            let period = Period::new(start, end, vest_date, entry.percent);
            start = vest_date;
            period
        })
        .collect()
}
