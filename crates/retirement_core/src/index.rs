//! Projection index
//!
//! Read-side view over a finished projection. Instances are grouped by
//! source, sink, category and payment year; asset valuation series and loan
//! balances are kept alongside for net-worth reporting.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::date_math::jan_first;
use crate::market::balance_on;
use crate::model::{AssetId, CashBalance, CashFlowInstance, EntityId, ItemType, SourceId};
use crate::scenario::ScenarioContext;
use crate::scheduler::{CompatibilityRisk, Projection};
use crate::sources::{ProjectionWarning, SourceKind};
use crate::tracker::fold_cash;

/// Totals for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i16,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
}

#[derive(Debug, Clone)]
pub struct ProjectionIndex {
    instances: Vec<CashFlowInstance>,
    by_source: FxHashMap<SourceId, Vec<usize>>,
    by_sink: FxHashMap<EntityId, Vec<usize>>,
    by_category: FxHashMap<String, Vec<usize>>,
    by_year: BTreeMap<i16, Vec<usize>>,
    asset_values: BTreeMap<AssetId, Vec<CashBalance>>,
    /// Starting balance of every loan source
    loans: BTreeMap<SourceId, Decimal>,
    warnings: Vec<ProjectionWarning>,
    risks: Vec<CompatibilityRisk>,
    layers: Vec<Vec<SourceId>>,
}

impl ProjectionIndex {
    pub fn new(projection: Projection, ctx: &ScenarioContext) -> Self {
        let Projection {
            instances,
            warnings,
            risks,
            layers,
        } = projection;

        let mut by_source: FxHashMap<SourceId, Vec<usize>> = FxHashMap::default();
        let mut by_sink: FxHashMap<EntityId, Vec<usize>> = FxHashMap::default();
        let mut by_category: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut by_year: BTreeMap<i16, Vec<usize>> = BTreeMap::new();
        for (i, instance) in instances.iter().enumerate() {
            by_source.entry(instance.source_id.clone()).or_default().push(i);
            by_sink.entry(instance.sink_id.clone()).or_default().push(i);
            by_category.entry(instance.category.clone()).or_default().push(i);
            by_year.entry(instance.payment_year()).or_default().push(i);
        }

        let asset_values = ctx
            .assets()
            .iter()
            .map(|asset| {
                let series = asset.valuation_series(ctx.horizon_end(), ctx.assumptions());
                (asset.id.clone(), series)
            })
            .collect();

        let loans = ctx
            .sources()
            .iter()
            .filter_map(|source| match &source.kind {
                SourceKind::Loan(terms) => Some((source.id.clone(), terms.starting_balance)),
                _ => None,
            })
            .collect();

        Self {
            instances,
            by_source,
            by_sink,
            by_category,
            by_year,
            asset_values,
            loans,
            warnings,
            risks,
            layers,
        }
    }

    /// Every instance, sorted by payment date.
    pub fn instances(&self) -> &[CashFlowInstance] {
        &self.instances
    }

    fn select<'a>(&'a self, indices: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a CashFlowInstance> + 'a {
        indices
            .into_iter()
            .flatten()
            .map(|&i| &self.instances[i])
    }

    /// Sum of a source's amounts paid in `year`.
    pub fn annual_total(&self, source: &SourceId, year: i16) -> Decimal {
        self.select(self.by_source.get(source))
            .filter(|i| i.payment_year() == year)
            .map(|i| i.amount)
            .sum()
    }

    /// Sum of every amount paid in `year`.
    pub fn net_total(&self, year: i16) -> Decimal {
        self.select(self.by_year.get(&year)).map(|i| i.amount).sum()
    }

    pub fn instances_for_source(&self, source: &SourceId, year: Option<i16>) -> Vec<&CashFlowInstance> {
        self.select(self.by_source.get(source))
            .filter(|i| year.is_none_or(|y| i.payment_year() == y))
            .collect()
    }

    pub fn instances_for_sink(&self, sink: &EntityId, year: Option<i16>) -> Vec<&CashFlowInstance> {
        self.select(self.by_sink.get(sink))
            .filter(|i| year.is_none_or(|y| i.payment_year() == y))
            .collect()
    }

    pub fn instances_in_category(&self, category: &str) -> Vec<&CashFlowInstance> {
        self.select(self.by_category.get(category)).collect()
    }

    /// Running balance of a source after each of its instances.
    pub fn source_balances(&self, source: &SourceId) -> Vec<CashBalance> {
        self.select(self.by_source.get(source))
            .map(|i| CashBalance::new(i.payment_date, i.running_balance))
            .collect()
    }

    /// Cash balance of a sink after each amount paid into or out of it.
    pub fn sink_balances(&self, sink: &EntityId) -> Vec<CashBalance> {
        fold_cash(
            self.select(self.by_sink.get(sink))
                .map(|i| (i.payment_date, i.amount)),
        )
    }

    /// Years with at least one payment, ascending.
    pub fn years(&self) -> Vec<i16> {
        self.by_year.keys().copied().collect()
    }

    pub fn category_totals(&self, year: i16) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for instance in self.select(self.by_year.get(&year)) {
            *totals
                .entry(instance.category.clone())
                .or_insert(Decimal::ZERO) += instance.amount;
        }
        totals
    }

    /// Sum of amounts paid within `[start, end]` matching `predicate`.
    pub fn sum_matching<P>(&self, start: Date, end: Date, mut predicate: P) -> Decimal
    where
        P: FnMut(&CashFlowInstance) -> bool,
    {
        self.instances
            .iter()
            .filter(|i| i.is_paid_between(start, end) && predicate(i))
            .map(|i| i.amount)
            .sum()
    }

    /// Value of an asset on January 1 of `year`.
    pub fn asset_value(&self, asset: &AssetId, year: i16) -> Option<Decimal> {
        self.asset_values
            .get(asset)
            .map(|series| balance_on(series, jan_first(year)).value)
    }

    pub fn total_asset_value(&self, year: i16) -> Decimal {
        self.asset_values
            .values()
            .map(|series| balance_on(series, jan_first(year)).value)
            .sum()
    }

    /// Outstanding balance of a loan going into `year`, reported negative.
    ///
    /// That is the balance after the last payment before January 1, or the
    /// starting balance when nothing has been paid yet.
    pub fn liability_amount(&self, loan: &SourceId, year: i16) -> Option<Decimal> {
        let starting = self.loans.get(loan)?;
        let cutoff = jan_first(year);
        let balance = self
            .select(self.by_source.get(loan))
            .filter(|i| i.payment_date < cutoff)
            .filter_map(|i| i.loan)
            .last()
            .map_or(*starting, |split| split.balance);
        Some(-balance)
    }

    pub fn total_liabilities(&self, year: i16) -> Decimal {
        self.loans
            .keys()
            .filter_map(|loan| self.liability_amount(loan, year))
            .sum()
    }

    /// Assets plus (negative) liabilities on January 1 of `year`.
    pub fn net_worth(&self, year: i16) -> Decimal {
        self.total_asset_value(year) + self.total_liabilities(year)
    }

    pub fn year_summary(&self, year: i16) -> YearSummary {
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for instance in self.select(self.by_year.get(&year)) {
            match instance.item_type {
                ItemType::Income => income += instance.amount,
                ItemType::Expense => expenses += instance.amount,
                ItemType::Transfer => {}
            }
        }
        let assets = self.total_asset_value(year);
        let liabilities = self.total_liabilities(year);
        YearSummary {
            year,
            income,
            expenses,
            net: income + expenses,
            assets,
            liabilities,
            net_worth: assets + liabilities,
        }
    }

    /// Computation errors reported during evaluation.
    pub fn warnings(&self) -> &[ProjectionWarning] {
        &self.warnings
    }

    pub fn risks(&self) -> &[CompatibilityRisk] {
        &self.risks
    }

    pub fn layers(&self) -> &[Vec<SourceId>] {
        &self.layers
    }
}
