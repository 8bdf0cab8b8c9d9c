//! Bonus as a percentage of the current salary.
//!
//! The salary is read from the snapshot: the annualized amount of the salary
//! instance in effect at the end of the bonus period. A bonus is only paid
//! for accrual years in which the salary produced income.

use jiff::civil::Date;

use super::fixed::apportion;
use super::{project_periods, CashFlowSource, PercentOfSalary, SourceOutput};
use crate::error::ComputeError;
use crate::model::Period;
use crate::money::checked_mul;
use crate::snapshot::Snapshot;
use crate::tracker::next_cash_balance;

pub(super) fn project(
    source: &CashFlowSource,
    terms: &PercentOfSalary,
    periods: &[Period],
    as_of: Date,
    snapshot: &Snapshot<'_>,
) -> SourceOutput {
    project_periods(source, periods, as_of, |period, prior| {
        if !snapshot.has_income_in_year(&terms.salary, period.accrual_year()) {
            return Ok(None);
        }
        let salary = snapshot
            .annual_salary_at(&terms.salary, period.accrual_end)
            .ok_or_else(|| ComputeError::SalaryUnavailable {
                salary: terms.salary.clone(),
                date: period.accrual_end,
            })?;

        let annual = checked_mul(salary, terms.bonus_percent)?;
        let amount = apportion(annual, period.portion)?;
        let mut instance = source.instance(period, amount);
        instance.running_balance = next_cash_balance(prior, amount)?;
        instance.annualized = Some(annual);
        instance.description = format!("{} of {} salary", terms.bonus_percent, terms.salary);
        Ok(Some(instance))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::model::{CashFlowInstance, EntityId, ItemType, SourceId};
    use crate::sources::SourceKind;
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn paycheck(start: Date, end: Date, annual: Decimal) -> CashFlowInstance {
        CashFlowInstance {
            source_id: SourceId::from("paycheck"),
            sink_id: EntityId::from("checking"),
            owner: Some(EntityId::from("pat")),
            category: "Paycheck".to_string(),
            parent_category: "Income".to_string(),
            item_type: ItemType::Income,
            accrual_start: start,
            accrual_end: end,
            payment_date: end,
            amount: annual / dec!(12),
            running_balance: Decimal::ZERO,
            annualized: Some(annual),
            loan: None,
            description: String::new(),
            historical: false,
        }
    }

    fn bonus() -> (CashFlowSource, PercentOfSalary) {
        let terms = PercentOfSalary {
            salary: SourceId::from("paycheck"),
            bonus_percent: dec!(0.10),
        };
        let source = CashFlowSource::new(
            "bonus",
            "annual",
            "checking",
            SourceKind::BonusAnnualPct(terms.clone()),
        );
        (source, terms)
    }

    #[test]
    fn test_uses_salary_in_effect_at_period_end() {
        let pool = vec![
            paycheck(date(2015, 1, 1), date(2015, 1, 31), dec!(100000)),
            paycheck(date(2015, 7, 1), date(2015, 7, 31), dec!(120000)),
        ];
        let snapshot = Snapshot::new(&pool);
        let (source, terms) = bonus();
        let periods =
            Frequency::annual("annual", date(2015, 1, 1), date(2015, 12, 31), date(2016, 3, 15))
                .periods();

        let output = project(&source, &terms, &periods, date(2014, 12, 31), &snapshot);
        assert_eq!(output.instances.len(), 1);
        assert_eq!(output.instances[0].amount, dec!(12000.00));
        assert_eq!(output.instances[0].payment_date, date(2016, 3, 15));
    }

    #[test]
    fn test_no_bonus_without_salary_income_that_year() {
        let pool = vec![paycheck(date(2015, 1, 1), date(2015, 1, 31), dec!(100000))];
        let snapshot = Snapshot::new(&pool);
        let (source, terms) = bonus();
        let periods =
            Frequency::annual("annual", date(2015, 1, 1), date(2016, 12, 31), date(2016, 3, 15))
                .periods();

        let output = project(&source, &terms, &periods, date(2014, 12, 31), &snapshot);
        assert_eq!(output.instances.len(), 1);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_overflowing_bonus_is_a_warning() {
        let pool = vec![paycheck(date(2015, 1, 1), date(2015, 1, 31), Decimal::MAX)];
        let snapshot = Snapshot::new(&pool);
        let (source, mut terms) = bonus();
        terms.bonus_percent = dec!(10);
        let periods =
            Frequency::annual("annual", date(2015, 1, 1), date(2015, 12, 31), date(2016, 3, 15))
                .periods();

        let output = project(&source, &terms, &periods, date(2014, 12, 31), &snapshot);
        assert!(output.instances.is_empty());
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].error, ComputeError::Overflow);
        assert_eq!(output.warnings[0].payment_date, date(2016, 3, 15));
    }
}
