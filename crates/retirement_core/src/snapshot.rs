//! Read-only view over instances computed so far.
//!
//! The scheduler hands each evaluation layer a snapshot of history plus the
//! output of every earlier layer. Sources query other sources only through
//! this view, so a layer can never observe a partially computed one.

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::error::ComputeResult;
use crate::model::{CashFlowInstance, EntityId, SourceId};
use crate::money::checked_sum;

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    instances: &'a [CashFlowInstance],
}

impl<'a> Snapshot<'a> {
    pub fn new(instances: &'a [CashFlowInstance]) -> Self {
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, CashFlowInstance> {
        self.instances.iter()
    }

    /// Sum of amounts paid within `[start, end]` that match `predicate`.
    pub fn sum_matching<P>(&self, start: Date, end: Date, mut predicate: P) -> ComputeResult<Decimal>
    where
        P: FnMut(&CashFlowInstance) -> bool,
    {
        checked_sum(
            self.instances
                .iter()
                .filter(|i| i.is_paid_between(start, end) && predicate(i))
                .map(|i| i.amount),
        )
    }

    /// Income attributed to `owner` paid within `[start, end]`.
    pub fn income_owned_by(&self, owner: &EntityId, start: Date, end: Date) -> ComputeResult<Decimal> {
        self.sum_matching(start, end, |i| i.is_income() && i.is_owned_by(owner))
    }

    pub fn for_source<'s>(&'s self, source: &'s SourceId) -> impl Iterator<Item = &'a CashFlowInstance> + 's {
        self.instances.iter().filter(move |i| &i.source_id == source)
    }

    /// Annual amount of `salary` in effect on `date`.
    ///
    /// That is the annualized amount of the instance with the latest accrual
    /// start on or before `date`, falling back to the earliest instance when
    /// every instance starts later.
    pub fn annual_salary_at(&self, salary: &SourceId, date: Date) -> Option<Decimal> {
        let mut in_effect: Option<&CashFlowInstance> = None;
        let mut earliest: Option<&CashFlowInstance> = None;
        for instance in self.for_source(salary).filter(|i| i.annualized.is_some()) {
            if earliest.is_none_or(|e| instance.accrual_start < e.accrual_start) {
                earliest = Some(instance);
            }
            if instance.accrual_start <= date
                && in_effect.is_none_or(|e| instance.accrual_start >= e.accrual_start)
            {
                in_effect = Some(instance);
            }
        }
        in_effect.or(earliest).and_then(|i| i.annualized)
    }

    /// True when `source` has positive income accrued in `year`.
    pub fn has_income_in_year(&self, source: &SourceId, year: i16) -> bool {
        self.for_source(source)
            .any(|i| i.accrual_end.year() == year && i.amount > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::model::ItemType;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    fn instance(source: &str, owner: &str, item_type: ItemType, paid: Date, amount: Decimal) -> CashFlowInstance {
        CashFlowInstance {
            source_id: SourceId::from(source),
            sink_id: EntityId::from("checking"),
            owner: Some(EntityId::from(owner)),
            category: String::new(),
            parent_category: String::new(),
            item_type,
            accrual_start: paid,
            accrual_end: paid,
            payment_date: paid,
            amount,
            running_balance: Decimal::ZERO,
            annualized: None,
            loan: None,
            description: String::new(),
            historical: false,
        }
    }

    #[test]
    fn test_income_owned_by_window() {
        let pool = vec![
            instance("a", "pat", ItemType::Income, date(2015, 1, 15), dec!(100)),
            instance("a", "pat", ItemType::Income, date(2015, 2, 15), dec!(200)),
            instance("b", "pat", ItemType::Expense, date(2015, 1, 20), dec!(-50)),
            instance("c", "sam", ItemType::Income, date(2015, 1, 20), dec!(400)),
        ];
        let snapshot = Snapshot::new(&pool);
        let pat = EntityId::from("pat");
        assert_eq!(snapshot.income_owned_by(&pat, date(2015, 1, 1), date(2015, 1, 31)), Ok(dec!(100)));
        // Window ends are inclusive
        assert_eq!(snapshot.income_owned_by(&pat, date(2015, 1, 15), date(2015, 2, 15)), Ok(dec!(300)));
    }

    #[test]
    fn test_income_overflow_is_an_error() {
        let pool = vec![
            instance("a", "pat", ItemType::Income, date(2015, 1, 15), Decimal::MAX),
            instance("b", "pat", ItemType::Income, date(2015, 1, 20), Decimal::MAX),
        ];
        let snapshot = Snapshot::new(&pool);
        assert_eq!(
            snapshot.income_owned_by(&EntityId::from("pat"), date(2015, 1, 1), date(2015, 1, 31)),
            Err(ComputeError::Overflow)
        );
    }

    #[test]
    fn test_annual_salary_at() {
        let mut early = instance("pay", "pat", ItemType::Income, date(2015, 1, 31), dec!(1000));
        early.accrual_start = date(2015, 1, 1);
        early.annualized = Some(dec!(12000));
        let mut raise = instance("pay", "pat", ItemType::Income, date(2015, 6, 30), dec!(1500));
        raise.accrual_start = date(2015, 6, 1);
        raise.annualized = Some(dec!(18000));
        let pool = vec![raise, early];
        let snapshot = Snapshot::new(&pool);
        let pay = SourceId::from("pay");

        assert_eq!(snapshot.annual_salary_at(&pay, date(2015, 3, 1)), Some(dec!(12000)));
        assert_eq!(snapshot.annual_salary_at(&pay, date(2015, 12, 31)), Some(dec!(18000)));
        assert_eq!(snapshot.annual_salary_at(&pay, date(2014, 12, 31)), Some(dec!(12000)));
        assert_eq!(snapshot.annual_salary_at(&SourceId::from("none"), date(2015, 3, 1)), None);
    }
}
