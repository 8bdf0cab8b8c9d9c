//! Calendar generation across every frequency rule

use jiff::civil::date;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::frequency::{Frequency, Vesting};
use crate::model::Period;

fn all_rules() -> Vec<Frequency> {
    let start = date(2015, 1, 1);
    let end = date(2019, 12, 31);
    vec![
        Frequency::annual("annual", start, end, date(2016, 4, 15)),
        Frequency::semi_annual("semi_annual", start, end, date(2015, 7, 15), date(2015, 6, 30)),
        Frequency::quarterly("quarterly", start, end, date(2015, 4, 15), date(2015, 3, 31)),
        Frequency::monthly("monthly", start, end, date(2015, 1, 31)),
        Frequency::semi_monthly("semi_monthly", start, end, date(2015, 1, 15), 15, 31),
        Frequency::biweekly("biweekly", start, end, date(2015, 1, 9), date(2014, 12, 22)),
        Frequency::vesting_schedule(
            "vesting",
            date(2015, 3, 15),
            vec![
                Vesting {
                    months: 12,
                    percent: dec!(0.25),
                },
                Vesting {
                    months: 24,
                    percent: dec!(0.25),
                },
                Vesting {
                    months: 36,
                    percent: dec!(0.5),
                },
            ],
        ),
    ]
}

fn assert_ordered(id: &str, periods: &[Period]) {
    assert!(!periods.is_empty(), "{id} produced no periods");
    for pair in periods.windows(2) {
        assert!(
            pair[1].accrual_start > pair[0].accrual_end,
            "{id}: {:?} overlaps {:?}",
            pair[1],
            pair[0]
        );
        assert!(
            pair[1].payment_date > pair[0].payment_date,
            "{id}: payments out of order at {:?}",
            pair[1]
        );
    }
    for period in periods {
        assert!(period.accrual_start <= period.accrual_end, "{id}: {period:?}");
        assert!(period.portion >= Decimal::ZERO, "{id}: {period:?}");
    }
}

/// Test every rule yields ordered, non-overlapping periods
#[test]
fn test_periods_are_ordered_and_disjoint() {
    for frequency in all_rules() {
        frequency.validate().unwrap();
        assert_ordered(frequency.id.as_str(), &frequency.periods());
    }
}

/// Test generation is deterministic
#[test]
fn test_periods_are_idempotent() {
    for frequency in all_rules() {
        assert_eq!(frequency.periods(), frequency.periods(), "{}", frequency.id);
    }
}

/// Test every period stays within the accrual window
#[test]
fn test_periods_stay_within_accrual_window() {
    for frequency in all_rules() {
        for period in frequency.periods() {
            assert!(period.accrual_start >= frequency.accrue_start, "{period:?}");
            assert!(period.accrual_end <= frequency.accrue_end, "{period:?}");
        }
    }
}

/// Test the periodic rules cover five years with the expected counts
#[test]
fn test_five_year_period_counts() {
    let counts: Vec<(String, usize)> = all_rules()
        .iter()
        .map(|f| (f.id.to_string(), f.periods().len()))
        .collect();
    let expected = [
        ("annual", 5),
        ("semi_annual", 10),
        ("quarterly", 20),
        ("monthly", 60),
        ("semi_monthly", 120),
        ("vesting", 3),
    ];
    for (id, count) in expected {
        let actual = counts.iter().find(|(i, _)| i == id).map(|(_, c)| *c);
        assert_eq!(actual, Some(count), "{id}");
    }
}

/// Test a monthly calendar pays at each month end, clamped in February
#[test]
fn test_monthly_payments_track_month_end() {
    let f = Frequency::monthly("m", date(2016, 1, 1), date(2016, 3, 31), date(2016, 1, 31));
    let payments: Vec<_> = f.periods().iter().map(|p| p.payment_date).collect();
    assert_eq!(payments, vec![date(2016, 1, 31), date(2016, 2, 29), date(2016, 3, 31)]);
}
