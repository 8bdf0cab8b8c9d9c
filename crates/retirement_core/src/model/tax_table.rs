//! Income tax bracket tables
//!
//! Defines the per-year bracket tables. The marginal tax computation lives
//! in the `taxes` module.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single bracket of a progressive tax system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    /// Income at which this bracket begins
    #[serde(alias = "startOfBracket")]
    pub start: Decimal,
    /// Marginal rate for income above `start` (e.g. 0.22 for 22%)
    #[serde(alias = "marginalRate")]
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(start: Decimal, rate: Decimal) -> Self {
        Self { start, rate }
    }
}

/// Bracket tables keyed by tax year.
///
/// Brackets of each year are kept sorted by descending start so the tax
/// computation can walk them from the highest threshold down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<i16, Vec<TaxBracket>>", into = "BTreeMap<i16, Vec<TaxBracket>>")]
pub struct TaxTable {
    years: BTreeMap<i16, Vec<TaxBracket>>,
}

impl TaxTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_year(&mut self, year: i16, mut brackets: Vec<TaxBracket>) {
        brackets.sort_by(|a, b| b.start.cmp(&a.start));
        self.years.insert(year, brackets);
    }

    #[must_use]
    pub fn with_year(mut self, year: i16, brackets: Vec<TaxBracket>) -> Self {
        self.insert_year(year, brackets);
        self
    }

    /// Brackets for `year`, highest start first.
    pub fn brackets(&self, year: i16) -> Option<&[TaxBracket]> {
        self.years.get(&year).map(Vec::as_slice)
    }

    pub fn years(&self) -> impl Iterator<Item = i16> + '_ {
        self.years.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl From<BTreeMap<i16, Vec<TaxBracket>>> for TaxTable {
    fn from(years: BTreeMap<i16, Vec<TaxBracket>>) -> Self {
        let mut table = TaxTable::new();
        for (year, brackets) in years {
            table.insert_year(year, brackets);
        }
        table
    }
}

impl From<TaxTable> for BTreeMap<i16, Vec<TaxBracket>> {
    fn from(table: TaxTable) -> Self {
        table.years
    }
}
