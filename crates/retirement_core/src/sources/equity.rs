//! Equity vesting (RSUs and stock options)
//!
//! Each vesting period releases `total_units * portion` units valued at the
//! security's price on the accrual end. Options are worth only the spread
//! over the strike price, never less than zero. The running balance is the
//! value of all units vested so far at the latest price.

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::{project_periods, CashFlowSource, EquityKind, EquityTerms, SourceOutput};
use crate::market::Security;
use crate::model::{Assumptions, Period, ShareBalance};
use crate::money::{checked_mul, checked_sub, round_cents};

pub(super) fn project(
    source: &CashFlowSource,
    terms: &EquityTerms,
    security: &Security,
    assumptions: &Assumptions,
    periods: &[Period],
    as_of: Date,
) -> SourceOutput {
    let grantor = source
        .payers
        .first()
        .map_or_else(|| source.name.clone(), ToString::to_string);
    let mut vested: Option<ShareBalance> = None;

    project_periods(source, periods, as_of, |period, _prior| {
        let price = security.price_at(period.accrual_end, assumptions)?;
        let units = checked_mul(terms.total_units, period.portion)?;
        let unit_value = match terms.kind {
            EquityKind::Rsu => price,
            EquityKind::StockOption => checked_sub(price, terms.strike_price)?.max(Decimal::ZERO),
        };
        let amount = checked_mul(unit_value, units).map(round_cents)?;

        let change = ShareBalance::new(period.accrual_end, units, price, terms.security.clone());
        let balance = match &vested {
            Some(held) => held.apply_change(&change)?,
            None => ShareBalance::new(period.accrual_start, Decimal::ZERO, price, terms.security.clone())
                .apply_change(&change)?,
        };

        let mut instance = source.instance(period, amount);
        instance.running_balance = balance.checked_value()?;
        instance.description = format!("{grantor}: {} shares @ ${price}", round_cents(units));
        vested = Some(balance);
        Ok(Some(instance))
    })
}
