//! Calendar arithmetic for period generation.
//!
//! Period rules work in whole days and calendar months. jiff `Span`
//! arithmetic is correct but needs rounding configuration for month math
//! and allocates a `Span` per call, so the helpers here use Rata Die day
//! numbers for day differences and direct year/month arithmetic for month
//! offsets. Month shifts clamp the day to the last valid day of the target
//! month, which is the behaviour every frequency rule relies on.

use jiff::civil::Date;

/// Fast leap year check.
#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in the given month without constructing a `Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

#[inline]
pub fn days_in_year(year: i16) -> i32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Day number counted from 0001-01-01 (proleptic Gregorian).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March is month 1 so the leap day lands at the end of the shifted year
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

#[inline]
fn rd_to_date(rd: i32) -> Date {
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Signed number of days from `d1` to `d2` (exclusive of `d2`).
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Number of days in `[start, end]`, counting both ends.
#[inline]
pub fn days_inclusive(start: Date, end: Date) -> i32 {
    days_between(start, end) + 1
}

#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    rd_to_date(rata_die(d) + n)
}

/// Build a date, clamping `day` to the length of the month.
#[inline]
pub fn date_clamped(year: i16, month: i8, day: i8) -> Date {
    jiff::civil::date(year, month, day.clamp(1, days_in_month(year, month)))
}

#[inline]
pub fn first_of_month(d: Date) -> Date {
    jiff::civil::date(d.year(), d.month(), 1)
}

#[inline]
pub fn last_of_month(d: Date) -> Date {
    jiff::civil::date(d.year(), d.month(), days_in_month(d.year(), d.month()))
}

#[inline]
pub fn is_last_of_month(d: Date) -> bool {
    d.day() == days_in_month(d.year(), d.month())
}

/// Whole calendar months from the month of `from` to the month of `to`,
/// ignoring the day of month.
#[inline]
pub fn months_between(from: Date, to: Date) -> i32 {
    (to.year() as i32 - from.year() as i32) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Shift `d` by `n` calendar months, clamping the day to the target month.
pub fn add_months(d: Date, n: i32) -> Date {
    let index = d.year() as i32 * 12 + (d.month() as i32 - 1) + n;
    let year = index.div_euclid(12) as i16;
    let month = (index.rem_euclid(12) + 1) as i8;
    date_clamped(year, month, d.day())
}

/// Like [`add_months`], but a month-end anchor stays on the month end
/// (Jun 30 + 6 months is Dec 31, not Dec 30).
pub fn add_months_sticky(d: Date, n: i32) -> Date {
    let shifted = add_months(d, n);
    if is_last_of_month(d) {
        last_of_month(shifted)
    } else {
        shifted
    }
}

#[inline]
pub fn jan_first(year: i16) -> Date {
    jiff::civil::date(year, 1, 1)
}

#[inline]
pub fn dec_last(year: i16) -> Date {
    jiff::civil::date(year, 12, 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_days_between_matches_jiff() {
        let pairs = [
            (date(2015, 5, 1), date(2016, 12, 31)),
            (date(2024, 2, 29), date(2025, 2, 28)),
            (date(2000, 3, 1), date(2100, 3, 1)),
            (date(2025, 12, 31), date(2026, 1, 1)),
        ];
        for (d1, d2) in pairs {
            let jiff_days = (d2 - d1).get_days();
            assert_eq!(days_between(d1, d2), jiff_days, "mismatch for {d1} → {d2}");
        }
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(days_inclusive(date(2015, 5, 1), date(2015, 5, 31)), 31);
        assert_eq!(days_inclusive(date(2015, 5, 10), date(2015, 5, 10)), 1);
    }

    #[test]
    fn test_add_days_across_boundaries() {
        assert_eq!(add_days(date(2025, 12, 31), 1), date(2026, 1, 1));
        assert_eq!(add_days(date(2024, 2, 28), 1), date(2024, 2, 29));
        assert_eq!(add_days(date(2025, 1, 1), -1), date(2024, 12, 31));
        assert_eq!(add_days(date(2015, 1, 2), 13), date(2015, 1, 15));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2015, 1, 31), 1), date(2015, 2, 28));
        assert_eq!(add_months(date(2016, 1, 31), 1), date(2016, 2, 29));
        assert_eq!(add_months(date(2015, 11, 15), 3), date(2016, 2, 15));
        assert_eq!(add_months(date(2015, 3, 15), -4), date(2014, 11, 15));
    }

    #[test]
    fn test_add_months_sticky_month_end() {
        assert_eq!(add_months_sticky(date(2015, 6, 30), 6), date(2015, 12, 31));
        assert_eq!(add_months_sticky(date(2015, 2, 28), 1), date(2015, 3, 31));
        assert_eq!(add_months_sticky(date(2015, 6, 15), 6), date(2015, 12, 15));
    }

    #[test]
    fn test_months_between_ignores_day() {
        assert_eq!(months_between(date(2015, 5, 31), date(2015, 6, 1)), 1);
        assert_eq!(months_between(date(2015, 5, 1), date(2015, 5, 31)), 0);
        assert_eq!(months_between(date(2016, 1, 1), date(2015, 11, 30)), -2);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(last_of_month(date(2016, 2, 10)), date(2016, 2, 29));
        assert_eq!(first_of_month(date(2016, 2, 10)), date(2016, 2, 1));
        assert!(is_last_of_month(date(2015, 4, 30)));
        assert!(!is_last_of_month(date(2015, 5, 30)));
        assert_eq!(days_in_year(2016), 366);
    }
}
