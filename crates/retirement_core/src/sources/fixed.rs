//! Salary, fixed bonus, rent and budget lines: an annual amount times the
//! period portion.

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::{project_periods, CashFlowSource, SourceOutput};
use crate::error::ComputeResult;
use crate::model::Period;
use crate::money::{checked_mul, round_cents};
use crate::tracker::next_cash_balance;

pub(super) fn project(
    source: &CashFlowSource,
    annual_amount: Decimal,
    periods: &[Period],
    as_of: Date,
) -> SourceOutput {
    project_periods(source, periods, as_of, |period, prior| {
        let amount = source.signed(apportion(annual_amount, period.portion)?);
        let mut instance = source.instance(period, amount);
        instance.running_balance = next_cash_balance(prior, amount)?;
        instance.annualized = Some(annual_amount);
        Ok(Some(instance))
    })
}

/// `annual * portion`, rounded to cents.
pub(crate) fn apportion(annual_amount: Decimal, portion: Decimal) -> ComputeResult<Decimal> {
    checked_mul(annual_amount, portion).map(round_cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::frequency::Frequency;
    use crate::model::ItemType;
    use crate::sources::{BudgetTerms, FixedAmount, SourceKind};
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_salary_apportions_monthly() {
        let source = CashFlowSource::new(
            "paycheck",
            "monthly",
            "checking",
            SourceKind::Salary(FixedAmount {
                annual_amount: dec!(120000),
            }),
        );
        let periods =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 3, 31), date(2015, 1, 31))
                .periods();
        let output = project(&source, dec!(120000), &periods, date(2014, 12, 31));

        let amounts: Vec<_> = output.instances.iter().map(|i| i.amount).collect();
        // 120000 * 0.0833333333
        assert_eq!(amounts, vec![dec!(10000.00); 3]);
        assert_eq!(output.instances[2].running_balance, dec!(30000.00));
        assert_eq!(output.instances[0].category, "Paycheck");
        assert_eq!(output.instances[0].annualized, Some(dec!(120000)));
    }

    #[test]
    fn test_expense_budget_is_negative() {
        let terms = BudgetTerms {
            category: "Groceries".to_string(),
            parent_category: "Food".to_string(),
            annual_amount: dec!(6000),
            item_type: ItemType::Expense,
        };
        let source = CashFlowSource::new("food", "monthly", "checking", SourceKind::Budget(terms));
        let periods =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 1, 31), date(2015, 1, 31))
                .periods();
        let output = project(&source, dec!(6000), &periods, date(2014, 12, 31));

        assert_eq!(output.instances[0].amount, dec!(-500.00));
        assert_eq!(output.instances[0].category, "Groceries");
        assert_eq!(output.instances[0].parent_category, "Food");
    }

    #[test]
    fn test_overflowing_balance_skips_period() {
        let huge = dec!(50000000000000000000000000000);
        let source = CashFlowSource::new(
            "paycheck",
            "monthly",
            "checking",
            SourceKind::Salary(FixedAmount { annual_amount: huge }),
        );
        let periods =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2016, 12, 31), date(2015, 1, 31))
                .periods();
        let output = project(&source, huge, &periods, date(2014, 12, 31));

        // Each paycheck fits; the running balance overflows partway through
        assert!(!output.instances.is_empty());
        assert!(!output.warnings.is_empty());
        assert_eq!(output.instances.len() + output.warnings.len(), 24);
        assert!(output.warnings.iter().all(|w| w.error == ComputeError::Overflow));
    }
}
