use super::Frequency;
use crate::date_math::{
    add_months, date_clamped, days_in_month, days_inclusive, first_of_month, last_of_month,
    months_between,
};
use crate::model::Period;
use crate::money::two_stage_portion;

pub(super) const PERIODS_PER_YEAR: u32 = 12;

/// One period per calendar month of the accrual window.
pub(super) fn periods(f: &Frequency) -> Vec<Period> {
    let payment_offset = months_between(f.accrue_start, f.first_payment_date);
    let payment_day = f.first_payment_date.day();

    let mut result = Vec::new();
    let mut month = first_of_month(f.accrue_start);
    while month <= f.accrue_end {
        let start = month.max(f.accrue_start);
        let end = last_of_month(month).min(f.accrue_end);

        let target = add_months(start, payment_offset);
        let payment = date_clamped(target.year(), target.month(), payment_day);

        let portion = two_stage_portion(
            days_inclusive(start, end),
            days_in_month(month.year(), month.month()) as i32,
            PERIODS_PER_YEAR,
        );
        result.push(Period::new(start, end, payment, portion));
        month = add_months(month, 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::super::Frequency;
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_window() {
        let f = Frequency::monthly("m", date(2015, 5, 1), date(2016, 12, 31), date(2015, 5, 15));
        let periods = f.periods();
        assert_eq!(periods.len(), 20);

        let first = &periods[0];
        assert_eq!(first.accrual_start, date(2015, 5, 1));
        assert_eq!(first.accrual_end, date(2015, 5, 31));
        assert_eq!(first.payment_date, date(2015, 5, 15));
        assert_eq!(first.portion, dec!(0.0833333333));

        let last = periods.last().unwrap();
        assert_eq!(last.accrual_start, date(2016, 12, 1));
        assert_eq!(last.payment_date, date(2016, 12, 15));
    }

    #[test]
    fn test_full_year_portions_sum_to_one() {
        let f = Frequency::monthly("m", date(2015, 1, 1), date(2015, 12, 31), date(2015, 1, 31));
        let total: Decimal = f.periods().iter().map(|p| p.portion).sum();
        assert!((total - Decimal::ONE).abs() < dec!(0.0000001), "got {total}");
    }

    #[test]
    fn test_payment_offset_and_clamp() {
        // Paid the month after accrual
        let f = Frequency::monthly("m", date(2015, 1, 1), date(2015, 4, 30), date(2015, 2, 28));
        let periods = f.periods();
        assert_eq!(periods[0].payment_date, date(2015, 2, 28));
        assert_eq!(periods[1].payment_date, date(2015, 3, 28));

        // Day 31 clamps to shorter months
        let f = Frequency::monthly("m", date(2015, 1, 1), date(2015, 4, 30), date(2015, 1, 31));
        let payments: Vec<_> = f.periods().iter().map(|p| p.payment_date).collect();
        assert_eq!(
            payments,
            vec![date(2015, 1, 31), date(2015, 2, 28), date(2015, 3, 31), date(2015, 4, 30)]
        );
    }

    #[test]
    fn test_truncated_window_is_one_period() {
        let f = Frequency::monthly("m", date(2015, 5, 10), date(2015, 5, 20), date(2015, 5, 25));
        let periods = f.periods();
        assert_eq!(periods.len(), 1);
        // round(round(11/31, 4) / 12, 10) = 0.3548 / 12
        assert_eq!(periods[0].portion, dec!(0.0295666667));
        assert_eq!(periods[0].payment_date, date(2015, 5, 25));
    }
}
