//! Income tax on the taxpayer's income earned in each period.

use jiff::civil::Date;

use super::{project_periods, CashFlowSource, SourceOutput};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{Period, TaxTable};
use crate::snapshot::Snapshot;
use crate::taxes::tax_for_year;
use crate::tracker::next_cash_balance;

pub const CATEGORY: &str = "Income Tax";

pub(super) fn project(
    source: &CashFlowSource,
    table: &TaxTable,
    periods: &[Period],
    as_of: Date,
    snapshot: &Snapshot<'_>,
) -> ConfigResult<SourceOutput> {
    let taxpayer = source.payers.first().ok_or_else(|| ConfigError::MissingParty {
        source_id: source.id.clone(),
        role: "taxpayer",
    })?;

    Ok(project_periods(source, periods, as_of, |period, prior| {
        let income = snapshot.income_owned_by(taxpayer, period.accrual_start, period.accrual_end)?;
        let tax = tax_for_year(table, period.accrual_year(), income)?;
        let mut instance = source.instance(period, -tax);
        instance.running_balance = next_cash_balance(prior, -tax)?;
        instance.description = format!("Estimated income tax for {taxpayer} on {income}");
        Ok(Some(instance))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::frequency::Frequency;
    use crate::model::{CashFlowInstance, EntityId, ItemType, SourceId, TaxBracket};
    use crate::sources::SourceKind;
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn income(paid: Date, amount: Decimal, owner: &str) -> CashFlowInstance {
        CashFlowInstance {
            source_id: SourceId::from("paycheck"),
            sink_id: EntityId::from("checking"),
            owner: Some(EntityId::from(owner)),
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

    fn tax_source() -> CashFlowSource {
        let mut source = CashFlowSource::new("tax", "annual", "checking", SourceKind::IncomeTax);
        source.payers.push(EntityId::from("pat"));
        source
    }

    fn table() -> TaxTable {
        TaxTable::new().with_year(
            2015,
            vec![
                TaxBracket::new(dec!(0), dec!(0.10)),
                TaxBracket::new(dec!(40000), dec!(0.20)),
            ],
        )
    }

    #[test]
    fn test_taxes_only_the_taxpayers_income() {
        let pool = vec![
            income(date(2015, 3, 31), dec!(30000), "pat"),
            income(date(2015, 9, 30), dec!(25000), "pat"),
            income(date(2015, 9, 30), dec!(99999), "sam"),
        ];
        let periods =
            Frequency::annual("annual", date(2015, 1, 1), date(2015, 12, 31), date(2016, 4, 15))
                .periods();
        let output = project(
            &tax_source(),
            &table(),
            &periods,
            date(2014, 12, 31),
            &Snapshot::new(&pool),
        )
        .unwrap();

        assert_eq!(output.instances.len(), 1);
        let instance = &output.instances[0];
        assert_eq!(instance.amount, dec!(-7000.00));
        assert_eq!(instance.category, CATEGORY);
        assert_eq!(instance.parent_category, "Taxes");
    }

    #[test]
    fn test_missing_year_skips_the_period() {
        let periods =
            Frequency::annual("annual", date(2015, 1, 1), date(2016, 12, 31), date(2016, 4, 15))
                .periods();
        let output = project(
            &tax_source(),
            &table(),
            &periods,
            date(2014, 12, 31),
            &Snapshot::new(&[]),
        )
        .unwrap();

        assert_eq!(output.instances.len(), 1);
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].error, ComputeError::TaxYearNotFound(2016));
    }
}
