//! Security prices and asset valuations
//!
//! Prices come from recorded history. A date past the end of the history is
//! priced by growing the latest price linearly at the long-term return. Asset
//! balances between recorded valuations grow linearly month by month at the
//! same rate.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date_math::{add_months, days_between};
use crate::error::{ComputeError, ComputeResult};
use crate::model::{AssetId, Assumptions, CashBalance, EntityId, SecurityId};
use crate::money::{checked_add, checked_mul, div_round, round_cents, round_half_up};

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

const GROWTH_SCALE: u32 = 8;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: SecurityId,
    #[serde(default)]
    pub prices: BTreeMap<Date, Decimal>,
}

impl Security {
    pub fn new(id: &str) -> Self {
        Self {
            id: SecurityId::from(id),
            prices: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn price(mut self, date: Date, price: Decimal) -> Self {
        self.prices.insert(date, price);
        self
    }

    /// Unit price on `date`.
    ///
    /// Exact history wins; inside the history the last earlier price is
    /// used; after it the latest price grows by
    /// `days / 365.25 (8 places) * long_term_return`.
    pub fn price_at(&self, date: Date, assumptions: &Assumptions) -> ComputeResult<Decimal> {
        if let Some(price) = self.prices.get(&date) {
            return Ok(*price);
        }
        let unavailable = || ComputeError::PriceUnavailable {
            security: self.id.clone(),
            date,
        };
        let (latest_date, latest_price) = self.prices.last_key_value().ok_or_else(unavailable)?;
        if date > *latest_date {
            let years = div_round(
                Decimal::from(days_between(*latest_date, date)),
                DAYS_PER_YEAR,
                GROWTH_SCALE,
            );
            let growth = checked_add(Decimal::ONE, checked_mul(years, assumptions.long_term_return)?)?;
            return checked_mul(*latest_price, growth);
        }
        self.prices
            .range(..date)
            .next_back()
            .map(|(_, price)| *price)
            .ok_or_else(unavailable)
    }
}

/// A valued holding such as a house or an outside brokerage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owners: Vec<EntityId>,
    pub initial_balance: CashBalance,
    /// Later recorded valuations, in any order
    #[serde(default)]
    pub interim_balances: Vec<CashBalance>,
}

impl Asset {
    pub fn new(id: &str, name: &str, initial_balance: CashBalance) -> Self {
        Self {
            id: AssetId::from(id),
            name: name.to_string(),
            owners: Vec::new(),
            initial_balance,
            interim_balances: Vec::new(),
        }
    }

    #[must_use]
    pub fn owner(mut self, owner: &str) -> Self {
        self.owners.push(EntityId::from(owner));
        self
    }

    #[must_use]
    pub fn valuation(mut self, balance: CashBalance) -> Self {
        self.interim_balances.push(balance);
        self
    }

    /// Recorded valuations plus monthly linear growth between them and from
    /// the last one through `horizon`, sorted by date.
    pub fn valuation_series(&self, horizon: Date, assumptions: &Assumptions) -> Vec<CashBalance> {
        let mut recorded = Vec::with_capacity(self.interim_balances.len() + 1);
        recorded.push(self.initial_balance);
        recorded.extend(self.interim_balances.iter().copied());
        recorded.sort_by_key(|b| b.date);

        let rate = assumptions.long_term_return;
        let mut series = Vec::new();
        for (i, base) in recorded.iter().enumerate() {
            series.push(*base);
            let limit = recorded.get(i + 1).map(|next| next.date);
            let mut month = 1;
            loop {
                let date = add_months(base.date, month);
                let past_limit = match limit {
                    Some(next) => date >= next,
                    None => date > horizon,
                };
                if past_limit {
                    break;
                }
                series.push(CashBalance::new(date, linear_growth(base.value, rate, month)));
                month += 1;
            }
        }
        series
    }
}

/// `value * (1 + rate * months / 12)`, multiplier at 10 places, value in cents.
fn linear_growth(value: Decimal, annual_rate: Decimal, months: i32) -> Decimal {
    let multiplier =
        Decimal::ONE + round_half_up(annual_rate * Decimal::from(months) / MONTHS_PER_YEAR, 10);
    round_cents(value * multiplier)
}

/// Latest balance on or before `date`; zero before the first one.
pub fn balance_on(series: &[CashBalance], date: Date) -> CashBalance {
    let idx = series.partition_point(|b| b.date <= date);
    if idx == 0 {
        CashBalance::zero(date)
    } else {
        series[idx - 1]
    }
}
