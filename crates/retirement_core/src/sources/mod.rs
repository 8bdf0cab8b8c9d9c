//! Cash-flow sources
//!
//! A source is a named business rule bound to one frequency. Projecting a
//! source walks its periods in order, handing each estimate the previous
//! instance of the same source so balances can thread through. Periods paid
//! on or before the scenario's as-of date are still estimated, and later
//! layers can read them, but they are not emitted.
//!
//! Sources that depend on other sources (bonus, alimony, income tax) read
//! them only through the [`Snapshot`] handed in by the scheduler.

pub mod alimony;
mod bonus;
mod equity;
mod fixed;
pub mod income_tax;
mod loan;

use std::hash::{Hash, Hasher};

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ComputeError, ConfigResult};
use crate::model::{
    CashFlowInstance, EntityId, FrequencyId, ItemType, Period, SecurityId, SourceId,
};
use crate::scenario::ScenarioContext;
use crate::scheduler::Stage;
use crate::snapshot::Snapshot;

pub const PARENT_INCOME: &str = "Income";
pub const PARENT_BILLS: &str = "Bills & Utilities";
pub const PARENT_TAXES: &str = "Taxes";

/// An annual amount apportioned across periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedAmount {
    pub annual_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentOfSalary {
    /// Salary source the bonus is computed from
    pub salary: SourceId,
    /// Fraction of the annual salary (0.15 for 15%)
    pub bonus_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTerms {
    pub category: String,
    #[serde(default = "BudgetTerms::default_parent")]
    pub parent_category: String,
    pub annual_amount: Decimal,
    pub item_type: ItemType,
}

impl BudgetTerms {
    fn default_parent() -> String {
        "Budget".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanKind {
    /// Fixed-payment amortizing loan with an optional escrow impound
    Secured,
    /// Credit line paid down by a fixed payment, no impound
    Revolving,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub kind: LoanKind,
    /// Annual rate in percent (3.875 for 3.875%)
    pub annual_rate_percent: Decimal,
    pub starting_balance: Decimal,
    pub payment: Decimal,
    #[serde(default)]
    pub impound: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquityKind {
    Rsu,
    StockOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityTerms {
    pub kind: EquityKind,
    pub security: SecurityId,
    pub total_units: Decimal,
    /// Exercise price; only read for stock options
    #[serde(default)]
    pub strike_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlimonyTerms {
    /// Payor income per override period above which the override applies
    pub base_income: Decimal,
    /// Fixed amount paid every base period
    pub base_alimony: Decimal,
    pub smith_ostler_rate: Decimal,
    /// Annual ceiling on base plus override; no ceiling when absent
    #[serde(default)]
    pub max_alimony: Option<Decimal>,
    pub smith_ostler_frequency: FrequencyId,
    /// Receives the override residual above the ceiling; the source's sink
    /// when absent
    #[serde(default)]
    pub excess_sink: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceKind {
    Salary(FixedAmount),
    BonusAnnualPct(PercentOfSalary),
    BonusPeriodicFixed(FixedAmount),
    Rent(FixedAmount),
    Budget(BudgetTerms),
    Loan(LoanTerms),
    Equity(EquityTerms),
    Alimony(AlimonyTerms),
    IncomeTax,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Salary(_) => "salary",
            SourceKind::BonusAnnualPct(_) => "bonusAnnualPct",
            SourceKind::BonusPeriodicFixed(_) => "bonusPeriodicFixed",
            SourceKind::Rent(_) => "rent",
            SourceKind::Budget(_) => "budget",
            SourceKind::Loan(_) => "loan",
            SourceKind::Equity(_) => "equity",
            SourceKind::Alimony(_) => "alimony",
            SourceKind::IncomeTax => "incomeTax",
        }
    }

    pub fn default_stage(&self) -> Stage {
        match self {
            SourceKind::BonusAnnualPct(_) => Stage::DerivedIncome,
            SourceKind::Alimony(_) => Stage::DerivedExpenses,
            SourceKind::IncomeTax => Stage::Taxes,
            _ => Stage::BaseCashFlows,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            SourceKind::Salary(_)
            | SourceKind::BonusAnnualPct(_)
            | SourceKind::BonusPeriodicFixed(_)
            | SourceKind::Rent(_)
            | SourceKind::Equity(_) => ItemType::Income,
            SourceKind::Budget(terms) => terms.item_type,
            SourceKind::Loan(_) | SourceKind::Alimony(_) | SourceKind::IncomeTax => {
                ItemType::Expense
            }
        }
    }

    pub fn category(&self) -> &str {
        match self {
            SourceKind::Salary(_) => "Paycheck",
            SourceKind::BonusAnnualPct(_) | SourceKind::BonusPeriodicFixed(_) => "Bonus",
            SourceKind::Rent(_) => "Rental Income",
            SourceKind::Budget(terms) => &terms.category,
            SourceKind::Loan(terms) => match terms.kind {
                LoanKind::Secured => "Mortgage",
                LoanKind::Revolving => "Credit Card Payment",
            },
            SourceKind::Equity(terms) => match terms.kind {
                EquityKind::Rsu => "RSUs",
                EquityKind::StockOption => "Stock Options",
            },
            SourceKind::Alimony(_) => alimony::CATEGORY,
            SourceKind::IncomeTax => income_tax::CATEGORY,
        }
    }

    pub fn parent_category(&self) -> &str {
        match self {
            SourceKind::Budget(terms) => &terms.parent_category,
            SourceKind::Loan(terms) if terms.kind == LoanKind::Secured => "Home",
            SourceKind::Loan(_) | SourceKind::Alimony(_) => PARENT_BILLS,
            SourceKind::IncomeTax => PARENT_TAXES,
            _ => PARENT_INCOME,
        }
    }

    /// Sources this kind reads by reference, beyond the stage ordering.
    pub fn referenced_sources(&self) -> Vec<&SourceId> {
        match self {
            SourceKind::BonusAnnualPct(terms) => vec![&terms.salary],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSource {
    pub id: SourceId,
    #[serde(default)]
    pub name: String,
    pub frequency: FrequencyId,
    #[serde(default)]
    pub payers: Vec<EntityId>,
    #[serde(default)]
    pub payees: Vec<EntityId>,
    /// Account receiving or paying the amounts
    pub sink: EntityId,
    /// Evaluation stage; the kind's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    /// Sources whose output this one must see
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<SourceId>,
    #[serde(flatten)]
    pub kind: SourceKind,
}

impl PartialEq for CashFlowSource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.frequency == other.frequency
    }
}

impl Hash for CashFlowSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.frequency.hash(state);
    }
}

impl CashFlowSource {
    pub fn new(id: &str, frequency: &str, sink: &str, kind: SourceKind) -> Self {
        Self {
            id: SourceId::from(id),
            name: id.to_string(),
            frequency: FrequencyId::from(frequency),
            payers: Vec::new(),
            payees: Vec::new(),
            sink: EntityId::from(sink),
            stage: None,
            depends_on: Vec::new(),
            kind,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage.unwrap_or_else(|| self.kind.default_stage())
    }

    /// Entity the amounts are attributed to: the first payee of income, the
    /// first payer otherwise.
    pub fn owner(&self) -> Option<&EntityId> {
        match self.kind.item_type() {
            ItemType::Income => self.payees.first(),
            ItemType::Expense | ItemType::Transfer => self.payers.first(),
        }
    }

    /// Explicit and by-reference dependencies, deduplicated.
    pub fn dependencies(&self) -> Vec<&SourceId> {
        let mut deps: Vec<&SourceId> = self.depends_on.iter().collect();
        for dep in self.kind.referenced_sources() {
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
        deps
    }

    /// Project every future instance of this source.
    ///
    /// `snapshot` holds history and the output of all layers evaluated
    /// before this source's layer.
    pub fn project(&self, ctx: &ScenarioContext, snapshot: &Snapshot<'_>) -> ConfigResult<SourceOutput> {
        let frequency = ctx.frequency_for(self, &self.frequency)?;
        let periods = frequency.periods();
        let as_of = ctx.as_of();

        let output = match &self.kind {
            SourceKind::Salary(terms)
            | SourceKind::BonusPeriodicFixed(terms)
            | SourceKind::Rent(terms) => fixed::project(self, terms.annual_amount, &periods, as_of),
            SourceKind::Budget(terms) => fixed::project(self, terms.annual_amount, &periods, as_of),
            SourceKind::BonusAnnualPct(terms) => bonus::project(self, terms, &periods, as_of, snapshot),
            SourceKind::Loan(terms) => loan::project(self, terms, frequency, &periods, as_of)?,
            SourceKind::Equity(terms) => {
                let security = ctx.security_for(self, &terms.security)?;
                equity::project(self, terms, security, ctx.assumptions(), &periods, as_of)
            }
            SourceKind::Alimony(terms) => {
                let smith_ostler = ctx.frequency_for(self, &terms.smith_ostler_frequency)?;
                alimony::project(self, terms, &periods, &smith_ostler.periods(), as_of, snapshot)?
            }
            SourceKind::IncomeTax => {
                income_tax::project(self, ctx.tax_table(), &periods, as_of, snapshot)?
            }
        };
        Ok(output)
    }

    /// Instance for `period` with this source's identity filled in and a
    /// zero running balance.
    pub(crate) fn instance(&self, period: &Period, amount: Decimal) -> CashFlowInstance {
        CashFlowInstance {
            source_id: self.id.clone(),
            sink_id: self.sink.clone(),
            owner: self.owner().cloned(),
            category: self.kind.category().to_string(),
            parent_category: self.kind.parent_category().to_string(),
            item_type: self.kind.item_type(),
            accrual_start: period.accrual_start,
            accrual_end: period.accrual_end,
            payment_date: period.payment_date,
            amount,
            running_balance: Decimal::ZERO,
            annualized: None,
            loan: None,
            description: String::new(),
            historical: false,
        }
    }

    /// Sign an unsigned amount by the item type: expenses are negative.
    pub(crate) fn signed(&self, amount: Decimal) -> Decimal {
        match self.kind.item_type() {
            ItemType::Expense => -amount,
            ItemType::Income | ItemType::Transfer => amount,
        }
    }
}

/// A computation error reported for one period of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionWarning {
    pub source_id: SourceId,
    pub payment_date: Date,
    #[serde(serialize_with = "serialize_display")]
    pub error: ComputeError,
}

fn serialize_display<S: serde::Serializer>(error: &ComputeError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

impl std::fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}: {}", self.source_id, self.payment_date, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceOutput {
    /// Instances paid after the as-of date
    pub instances: Vec<CashFlowInstance>,
    pub warnings: Vec<ProjectionWarning>,
    /// Estimates of periods paid on or before the as-of date. Later layers
    /// see them; they are never reported.
    pub settled: Vec<CashFlowInstance>,
}

/// Walk `periods` in order, threading the previous instance through
/// `estimate`.
///
/// Past periods are estimated so their instance can seed the next one and
/// land in `settled`, but only periods paid after `as_of` are emitted or
/// report warnings. An estimate of `None` emits nothing and leaves the
/// previous instance in place.
pub(crate) fn project_periods<F>(
    source: &CashFlowSource,
    periods: &[Period],
    as_of: Date,
    mut estimate: F,
) -> SourceOutput
where
    F: FnMut(&Period, Option<&CashFlowInstance>) -> Result<Option<CashFlowInstance>, ComputeError>,
{
    let mut output = SourceOutput::default();
    let mut prior: Option<CashFlowInstance> = None;

    for period in periods {
        let future = period.payment_date > as_of;
        match estimate(period, prior.as_ref()) {
            Ok(Some(instance)) => {
                if future {
                    output.instances.push(instance.clone());
                } else {
                    output.settled.push(instance.clone());
                }
                prior = Some(instance);
            }
            Ok(None) => {}
            Err(error) if future => output.warnings.push(ProjectionWarning {
                source_id: source.id.clone(),
                payment_date: period.payment_date,
                error,
            }),
            Err(_) => {}
        }
    }

    output
}
