use rust_decimal::Decimal;

use super::Frequency;
use crate::date_math::{date_clamped, days_between, days_in_year, dec_last, jan_first};
use crate::model::Period;
use crate::money::div_round;

pub(super) const PERIODS_PER_YEAR: u32 = 1;

/// One period per calendar year overlapping the accrual window.
///
/// Portion is the exclusive day count over the year length at two places;
/// payments fall on the first payment's month/day, offset by as many years
/// as the first payment is from the accrual start.
pub(super) fn periods(f: &Frequency) -> Vec<Period> {
    let first_year = f.accrue_start.year();
    let last_year = f.accrue_end.year();
    let year_offset = f.first_payment_date.year() - first_year;

    (first_year..=last_year)
        .map(|year| {
            let start = if year == first_year {
                f.accrue_start
            } else {
                jan_first(year)
            };
            let end = if year == last_year {
                f.accrue_end
            } else {
                dec_last(year)
            };
            let payment = date_clamped(
                year + year_offset,
                f.first_payment_date.month(),
                f.first_payment_date.day(),
            );
            let portion = div_round(
                Decimal::from(days_between(start, end)),
                Decimal::from(days_in_year(year)),
                2,
            );
            Period::new(start, end, payment, portion)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::Frequency;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_years_round_to_one() {
        let f = Frequency::annual("a", date(2015, 1, 1), date(2017, 12, 31), date(2016, 2, 15));
        let periods = f.periods();
        assert_eq!(periods.len(), 3);
        for p in &periods {
            assert_eq!(p.portion, dec!(1.00), "period {p:?}");
        }
        // First payment is a year after the accrual start, so every payment trails by a year
        assert_eq!(periods[0].payment_date, date(2016, 2, 15));
        assert_eq!(periods[2].payment_date, date(2018, 2, 15));
    }

    #[test]
    fn test_partial_first_and_last_year() {
        let f = Frequency::annual("a", date(2015, 7, 1), date(2016, 3, 31), date(2016, 3, 1));
        let periods = f.periods();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].accrual_start, date(2015, 7, 1));
        assert_eq!(periods[0].accrual_end, date(2015, 12, 31));
        // 183 / 365
        assert_eq!(periods[0].portion, dec!(0.50));
        assert_eq!(periods[1].accrual_start, date(2016, 1, 1));
        // 90 / 366
        assert_eq!(periods[1].portion, dec!(0.25));
        assert_eq!(periods[1].payment_date, date(2017, 3, 1));
    }

    #[test]
    fn test_single_short_window() {
        let f = Frequency::annual("a", date(2015, 6, 1), date(2015, 6, 30), date(2015, 12, 31));
        let periods = f.periods();
        assert_eq!(periods.len(), 1);
        // 29 / 365
        assert_eq!(periods[0].portion, dec!(0.08));
    }
}
