//! Smith-Ostler alimony
//!
//! A fixed base amount is paid every period of the source's own frequency.
//! Every period of the override frequency adds a share of the payor's income
//! above the base income threshold. Both streams together are capped per
//! accrual year; override residual above the cap is reassigned to the
//! excess sink under the "Spending" category instead of being dropped.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::{
    project_periods, AlimonyTerms, CashFlowSource, ProjectionWarning, SourceOutput, PARENT_BILLS,
};
use crate::date_math::{dec_last, jan_first};
use crate::error::{ComputeResult, ConfigError, ConfigResult};
use crate::model::{CashFlowInstance, Period};
use crate::money::{checked_mul, checked_sub, round_cents};
use crate::snapshot::Snapshot;
use crate::tracker::restate_running_balances;

pub const CATEGORY: &str = "Alimony";

pub const EXCESS_CATEGORY: &str = "Spending";

pub(super) fn project(
    source: &CashFlowSource,
    terms: &AlimonyTerms,
    base_periods: &[Period],
    override_periods: &[Period],
    as_of: Date,
    snapshot: &Snapshot<'_>,
) -> ConfigResult<SourceOutput> {
    let payor = source.payers.first().ok_or_else(|| ConfigError::MissingParty {
        source_id: source.id.clone(),
        role: "payor",
    })?;
    let payee = source
        .payees
        .first()
        .map_or_else(String::new, ToString::to_string);

    let base = project_periods(source, base_periods, as_of, |period, _| {
        let mut instance = source.instance(period, -terms.base_alimony);
        instance.description = format!("Alimony for {payee}");
        Ok(Some(instance))
    });

    let overrides = project_periods(source, override_periods, as_of, |period, _| {
        let income = snapshot.income_owned_by(payor, period.accrual_start, period.accrual_end)?;
        let amount = smith_ostler(income, terms)?;
        if amount.is_zero() {
            return Ok(None);
        }
        let mut instance = source.instance(period, -amount);
        instance.description = format!("Estimated Smith Ostler for {payee}");
        Ok(Some(instance))
    });

    let mut combined = base.instances;
    combined.extend(overrides.instances);
    combined.sort_by_key(|i| i.payment_date);

    let mut instances = match terms.max_alimony {
        Some(max) => cap_by_year(source, terms, combined, max, snapshot),
        None => combined,
    };

    let mut warnings = base.warnings;
    warnings.extend(overrides.warnings);
    warnings.extend(
        restate_running_balances(&mut instances)
            .into_iter()
            .map(|(payment_date, error)| ProjectionWarning {
                source_id: source.id.clone(),
                payment_date,
                error,
            }),
    );
    warnings.sort_by_key(|w| w.payment_date);

    let mut settled = base.settled;
    settled.extend(overrides.settled);
    Ok(SourceOutput {
        instances,
        warnings,
        settled,
    })
}

/// Override owed on `income` earned during one override period.
pub(crate) fn smith_ostler(income: Decimal, terms: &AlimonyTerms) -> ComputeResult<Decimal> {
    let excess = checked_sub(income, terms.base_income)?.max(Decimal::ZERO);
    checked_mul(excess, terms.smith_ostler_rate).map(round_cents)
}

/// Keep each accrual year's alimony within `max`.
///
/// The year-to-date total starts from alimony already in the snapshot for
/// that year (imported history). An instance that would cross the cap is
/// cut to what remains and the rest moves to the excess sink.
fn cap_by_year(
    source: &CashFlowSource,
    terms: &AlimonyTerms,
    instances: Vec<CashFlowInstance>,
    max: Decimal,
    snapshot: &Snapshot<'_>,
) -> Vec<CashFlowInstance> {
    let mut paid_by_year: BTreeMap<i16, Decimal> = BTreeMap::new();
    let mut result = Vec::with_capacity(instances.len());

    for mut instance in instances {
        let year = instance.accrual_end.year();
        // An imported total too large to add up has already used the cap
        let paid = paid_by_year.entry(year).or_insert_with(|| {
            snapshot
                .sum_matching(jan_first(year), dec_last(year), |i| {
                    i.source_id == source.id && i.category == CATEGORY
                })
                .map_or(max, |total| -total)
        });

        let owed = -instance.amount;
        let remaining = (max - *paid).max(Decimal::ZERO);
        if owed <= remaining {
            *paid += owed;
            result.push(instance);
            continue;
        }

        let mut excess = instance.clone();
        excess.amount = -(owed - remaining);
        excess.category = EXCESS_CATEGORY.to_string();
        excess.parent_category = PARENT_BILLS.to_string();
        excess.sink_id = terms
            .excess_sink
            .clone()
            .unwrap_or_else(|| source.sink.clone());
        excess.description = format!("Estimated {}", instance.description);

        if remaining > Decimal::ZERO {
            *paid += remaining;
            instance.amount = -remaining;
            result.push(instance);
        }
        result.push(excess);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::model::{EntityId, FrequencyId, ItemType, SourceId};
    use crate::sources::SourceKind;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    fn terms(max: Option<Decimal>) -> AlimonyTerms {
        AlimonyTerms {
            base_income: dec!(50000),
            base_alimony: dec!(1200),
            smith_ostler_rate: dec!(0.33),
            max_alimony: max,
            smith_ostler_frequency: FrequencyId::from("quarterly"),
            excess_sink: Some(EntityId::from("spending")),
        }
    }

    fn alimony(terms: &AlimonyTerms) -> CashFlowSource {
        let mut source =
            CashFlowSource::new("alimony", "monthly", "checking", SourceKind::Alimony(terms.clone()));
        source.payers.push(EntityId::from("pat"));
        source.payees.push(EntityId::from("sam"));
        source
    }

    fn income(paid: Date, amount: Decimal) -> CashFlowInstance {
        CashFlowInstance {
            source_id: SourceId::from("paycheck"),
            sink_id: EntityId::from("checking"),
            owner: Some(EntityId::from("pat")),
            category: "Paycheck".to_string(),
            parent_category: "Income".to_string(),
            item_type: ItemType::Income,
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
    fn test_override_on_income_above_base() {
        assert_eq!(smith_ostler(dec!(60000), &terms(None)), Ok(dec!(3300.00)));
        assert_eq!(smith_ostler(dec!(40000), &terms(None)), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_base_and_override_streams() {
        let t = terms(None);
        let source = alimony(&t);
        let monthly =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 3, 31), date(2015, 1, 31));
        let quarterly = Frequency::quarterly(
            "quarterly",
            date(2015, 1, 1),
            date(2015, 3, 31),
            date(2015, 4, 15),
            date(2015, 3, 31),
        );
        let pool = vec![income(date(2015, 2, 15), dec!(60000))];
        let snapshot = Snapshot::new(&pool);

        let output = project(
            &source,
            &t,
            &monthly.periods(),
            &quarterly.periods(),
            date(2014, 12, 31),
            &snapshot,
        )
        .unwrap();
        let amounts: Vec<_> = output.instances.iter().map(|i| i.amount).collect();
        assert_eq!(
            amounts,
            vec![dec!(-1200), dec!(-1200), dec!(-1200), dec!(-3300.00)]
        );
        assert_eq!(output.instances[3].running_balance, dec!(-6900.00));
    }

    #[test]
    fn test_annual_cap_moves_residual_to_excess_sink() {
        let t = terms(Some(dec!(5000)));
        let source = alimony(&t);
        let monthly =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 3, 31), date(2015, 1, 31));
        let quarterly = Frequency::quarterly(
            "quarterly",
            date(2015, 1, 1),
            date(2015, 3, 31),
            date(2015, 4, 15),
            date(2015, 3, 31),
        );
        let pool = vec![income(date(2015, 2, 15), dec!(60000))];
        let snapshot = Snapshot::new(&pool);

        let output = project(
            &source,
            &t,
            &monthly.periods(),
            &quarterly.periods(),
            date(2014, 12, 31),
            &snapshot,
        )
        .unwrap();

        let alimony_total: Decimal = output
            .instances
            .iter()
            .filter(|i| i.category == CATEGORY)
            .map(|i| i.amount)
            .sum();
        assert_eq!(alimony_total, dec!(-5000));

        let excess = output.instances.last().unwrap();
        assert_eq!(excess.category, EXCESS_CATEGORY);
        assert_eq!(excess.amount, dec!(-1900.00));
        assert_eq!(excess.sink_id, EntityId::from("spending"));
    }

    #[test]
    fn test_payor_is_required() {
        let t = terms(None);
        let mut source = alimony(&t);
        source.payers.clear();
        let err = project(&source, &t, &[], &[], date(2014, 12, 31), &Snapshot::new(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingParty { role: "payor", .. }));
    }
}
