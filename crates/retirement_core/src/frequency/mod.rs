//! Payment frequencies and period generation
//!
//! A [`Frequency`] couples an accrual window with a rule for slicing it into
//! periods. Generation is deterministic and can be repeated: the same
//! frequency always yields the same periods. Periods that are already in the
//! past are still generated; filtering against the scenario's as-of date is
//! the evaluator's job because running balances thread through them.
//!
//! Portion math keeps the two rounding stages of the reference model
//! (4 places, then 10 places after dividing by periods per year). Collapsing
//! them into one rounding changes yearly totals.

mod annual;
mod biweekly;
mod cycle;
mod monthly;
mod semi_monthly;
mod vesting;

use jiff::civil::{Date, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{FrequencyId, Period};

/// How a source should spread an annual amount. Informational only: the
/// generator does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApportionmentPeriod {
    WholeTerm,
    #[default]
    Annual,
    EqualMonthly,
}

/// One entry of a vesting schedule: `percent` vests `months` after the
/// schedule start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vesting {
    pub months: u32,
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum FrequencyRule {
    Annual,
    SemiAnnual {
        first_accrual_end: Date,
    },
    Quarterly {
        first_accrual_end: Date,
    },
    Monthly,
    SemiMonthly {
        first_payment_day_of_month: i8,
        second_payment_day_of_month: i8,
    },
    Biweekly {
        first_period_start: Date,
    },
    VestingSchedule {
        vesting: Vec<Vesting>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequency {
    pub id: FrequencyId,
    pub accrue_start: Date,
    pub accrue_end: Date,
    /// Anchor for offsetting payment dates from accrual dates
    pub first_payment_date: Date,
    #[serde(default)]
    pub apportionment_period: ApportionmentPeriod,
    #[serde(flatten)]
    pub rule: FrequencyRule,
}

impl Frequency {
    pub fn new(
        id: &str,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_date: Date,
        rule: FrequencyRule,
    ) -> Self {
        Self {
            id: FrequencyId::from(id),
            accrue_start,
            accrue_end,
            first_payment_date,
            apportionment_period: ApportionmentPeriod::default(),
            rule,
        }
    }

    pub fn annual(id: &str, accrue_start: Date, accrue_end: Date, first_payment_date: Date) -> Self {
        Self::new(id, accrue_start, accrue_end, first_payment_date, FrequencyRule::Annual)
    }

    pub fn monthly(id: &str, accrue_start: Date, accrue_end: Date, first_payment_date: Date) -> Self {
        Self::new(id, accrue_start, accrue_end, first_payment_date, FrequencyRule::Monthly)
    }

    pub fn semi_monthly(
        id: &str,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_date: Date,
        first_day: i8,
        second_day: i8,
    ) -> Self {
        Self::new(
            id,
            accrue_start,
            accrue_end,
            first_payment_date,
            FrequencyRule::SemiMonthly {
                first_payment_day_of_month: first_day,
                second_payment_day_of_month: second_day,
            },
        )
    }

    pub fn biweekly(
        id: &str,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_date: Date,
        first_period_start: Date,
    ) -> Self {
        Self::new(
            id,
            accrue_start,
            accrue_end,
            first_payment_date,
            FrequencyRule::Biweekly { first_period_start },
        )
    }

    pub fn semi_annual(
        id: &str,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_date: Date,
        first_accrual_end: Date,
    ) -> Self {
        Self::new(
            id,
            accrue_start,
            accrue_end,
            first_payment_date,
            FrequencyRule::SemiAnnual { first_accrual_end },
        )
    }

    pub fn quarterly(
        id: &str,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_date: Date,
        first_accrual_end: Date,
    ) -> Self {
        Self::new(
            id,
            accrue_start,
            accrue_end,
            first_payment_date,
            FrequencyRule::Quarterly { first_accrual_end },
        )
    }

    pub fn vesting_schedule(id: &str, accrue_start: Date, vesting: Vec<Vesting>) -> Self {
        let accrue_end = vesting
            .last()
            .map(|v| vesting::entry_end(accrue_start, v.months))
            .unwrap_or(accrue_start);
        let mut frequency = Self::new(
            id,
            accrue_start,
            accrue_end,
            accrue_start,
            FrequencyRule::VestingSchedule { vesting },
        );
        frequency.apportionment_period = ApportionmentPeriod::WholeTerm;
        frequency
    }

    #[must_use]
    pub fn apportioned(mut self, apportionment_period: ApportionmentPeriod) -> Self {
        self.apportionment_period = apportionment_period;
        self
    }

    /// Periods per year of a time-proportional rule; `None` for vesting
    /// schedules, whose portions are authored.
    pub fn periods_per_year(&self) -> Option<u32> {
        match self.rule {
            FrequencyRule::Annual => Some(annual::PERIODS_PER_YEAR),
            FrequencyRule::SemiAnnual { .. } => Some(cycle::SEMI_ANNUAL.periods_per_year),
            FrequencyRule::Quarterly { .. } => Some(cycle::QUARTERLY.periods_per_year),
            FrequencyRule::Monthly => Some(monthly::PERIODS_PER_YEAR),
            FrequencyRule::SemiMonthly { .. } => Some(semi_monthly::PERIODS_PER_YEAR),
            FrequencyRule::Biweekly { .. } => Some(biweekly::PERIODS_PER_YEAR),
            FrequencyRule::VestingSchedule { .. } => None,
        }
    }

    /// Weekday every payment of a biweekly frequency falls on.
    pub fn payment_weekday(&self) -> Option<Weekday> {
        match self.rule {
            FrequencyRule::Biweekly { .. } => Some(self.first_payment_date.weekday()),
            _ => None,
        }
    }

    /// Generate the ordered periods of this frequency.
    pub fn periods(&self) -> Vec<Period> {
        let periods = match &self.rule {
            FrequencyRule::Annual => annual::periods(self),
            FrequencyRule::SemiAnnual { first_accrual_end } => {
                cycle::periods(self, *first_accrual_end, cycle::SEMI_ANNUAL)
            }
            FrequencyRule::Quarterly { first_accrual_end } => {
                cycle::periods(self, *first_accrual_end, cycle::QUARTERLY)
            }
            FrequencyRule::Monthly => monthly::periods(self),
            FrequencyRule::SemiMonthly {
                first_payment_day_of_month,
                second_payment_day_of_month,
            } => semi_monthly::periods(
                self,
                *first_payment_day_of_month,
                *second_payment_day_of_month,
            ),
            FrequencyRule::Biweekly { first_period_start } => {
                biweekly::periods(self, *first_period_start)
            }
            FrequencyRule::VestingSchedule { vesting } => vesting::periods(self, vesting),
        };
        debug_assert!(
            is_strictly_ordered(&periods),
            "frequency {} produced overlapping or unordered periods",
            self.id
        );
        periods
    }

    /// Reject rules that cannot produce a well-formed sequence.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: &str| ConfigError::InvalidFrequency {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.accrue_end < self.accrue_start {
            return Err(invalid("accrual end precedes accrual start"));
        }

        match &self.rule {
            FrequencyRule::SemiAnnual { first_accrual_end }
            | FrequencyRule::Quarterly { first_accrual_end } => {
                if *first_accrual_end < self.accrue_start {
                    return Err(invalid("first accrual end precedes accrual start"));
                }
            }
            FrequencyRule::SemiMonthly {
                first_payment_day_of_month,
                second_payment_day_of_month,
            } => {
                let valid = 1..=31;
                if !valid.contains(first_payment_day_of_month)
                    || !valid.contains(second_payment_day_of_month)
                {
                    return Err(invalid("payment day of month must be between 1 and 31"));
                }
            }
            FrequencyRule::VestingSchedule { vesting } => {
                if vesting.is_empty() {
                    return Err(invalid("vesting schedule has no entries"));
                }
                let mut previous = 0;
                for entry in vesting {
                    if entry.months <= previous {
                        return Err(invalid("vesting months must be strictly increasing"));
                    }
                    previous = entry.months;
                }
            }
            FrequencyRule::Annual | FrequencyRule::Monthly | FrequencyRule::Biweekly { .. } => {}
        }
        Ok(())
    }
}

fn is_strictly_ordered(periods: &[Period]) -> bool {
    periods.iter().all(|p| p.accrual_start <= p.accrual_end)
        && periods
            .windows(2)
            .all(|w| w[0].accrual_end < w[1].accrual_start)
}
