//! Scenario-level tests
//!
//! Tests are organized by topic:
//! - `periods` - calendar ordering across every frequency rule
//! - `loans` - amortization through a full scenario
//! - `alimony` - Smith-Ostler overrides and the yearly cap
//! - `staging` - evaluation order, history seeding and as-of filtering
//! - `equity` - vesting valued at extrapolated prices
//! - `index` - yearly totals, balances and net worth
//! - `builder_dsl` - builder validation and batch projection

mod periods;

use jiff::civil::{date, Date};

use crate::config::ScenarioBuilder;
use crate::frequency::Frequency;

pub(crate) fn start() -> Date {
    date(2015, 1, 1)
}

/// Two projected years with the usual calendars and a household of two.
pub(crate) fn household() -> ScenarioBuilder {
    let end = date(2016, 12, 31);
    ScenarioBuilder::new("household")
        .name("Household")
        .as_of(2014, 12, 31)
        .person("pat", "Pat")
        .person("sam", "Sam")
        .company("acme", "Acme Corp")
        .account("checking", "Checking")
        .account("spending", "Spending")
        .frequency(Frequency::monthly("monthly", start(), end, date(2015, 1, 31)))
        .frequency(Frequency::quarterly(
            "quarterly",
            start(),
            end,
            date(2015, 4, 15),
            date(2015, 3, 31),
        ))
        .frequency(Frequency::annual("annual", start(), end, date(2016, 3, 15)))
}
