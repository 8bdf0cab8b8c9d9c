//! Scenario configuration
//!
//! The main configuration type is `ScenarioConfig`, a plain serde record with
//! everything needed to build a scenario. Loaders (YAML, JSON) deserialize
//! into it; [`Scenario::from_config`](crate::Scenario::from_config) validates
//! it.
//!
//! # Builder DSL
//!
//! For programmatic construction, use the builder DSL:
//!
//! ```ignore
//! use retirement_core::config::{ScenarioBuilder, SourceBuilder};
//! use retirement_core::Frequency;
//!
//! let scenario = ScenarioBuilder::new("base")
//!     .as_of(2014, 12, 31)
//!     .person("pat", "Pat")
//!     .company("acme", "Acme Corp")
//!     .account("checking", "Checking")
//!     .frequency(Frequency::monthly("monthly", start, end, first_payment))
//!     .source(
//!         SourceBuilder::salary("paycheck", dec!(120000))
//!             .frequency("monthly")
//!             .paid_by("acme")
//!             .paid_to("pat")
//!             .sink("checking"),
//!     )
//!     .build()?;
//! ```

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;
use crate::market::{Asset, Security};
use crate::model::{Assumptions, CashFlowInstance, Entity, SourceId, TaxTable};
use crate::sources::{CashFlowSource, SourceKind};

pub mod builder;
pub mod source_builder;

pub use builder::ScenarioBuilder;
pub use source_builder::SourceBuilder;

/// Complete scenario configuration
///
/// **Assumptions** (what you might compare across scenarios):
/// - `assumptions` - long-term return
/// - `tax_table` - brackets per year
///
/// **Your situation**:
/// - `entities` - people, employers and accounts
/// - `securities`, `assets` - prices and recorded valuations
/// - `history` - imported instances that seed the projection
///
/// **Your plan**:
/// - `frequencies` - payment calendars
/// - `sources` - the cash-flow rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Instances paid on or before this date are not projected
    pub as_of: Date,
    /// Last date asset valuations are extended to; the latest frequency end
    /// when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_end: Option<Date>,
    #[serde(default)]
    pub assumptions: Assumptions,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub frequencies: Vec<Frequency>,
    #[serde(default)]
    pub sources: Vec<CashFlowSource>,
    #[serde(default)]
    pub securities: Vec<Security>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub tax_table: TaxTable,
    #[serde(default)]
    pub history: Vec<CashFlowInstance>,
}

impl ScenarioConfig {
    /// Create an empty configuration
    pub fn new(id: &str, as_of: Date) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            as_of,
            horizon_end: None,
            assumptions: Assumptions::default(),
            entities: Vec::new(),
            frequencies: Vec::new(),
            sources: Vec::new(),
            securities: Vec::new(),
            assets: Vec::new(),
            tax_table: TaxTable::default(),
            history: Vec::new(),
        }
    }

    // === What-if helpers ===

    /// Variant projected from a different as-of date
    #[must_use]
    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = as_of;
        self
    }

    /// Variant with a different long-term return
    #[must_use]
    pub fn with_long_term_return(mut self, rate: Decimal) -> Self {
        self.assumptions.long_term_return = rate;
        self
    }

    /// Variant with a different annual amount for a salary, fixed bonus,
    /// rent or budget source. Other sources are left unchanged.
    #[must_use]
    pub fn with_annual_amount(mut self, source: &SourceId, amount: Decimal) -> Self {
        if let Some(source) = self.sources.iter_mut().find(|s| &s.id == source) {
            match &mut source.kind {
                SourceKind::Salary(terms)
                | SourceKind::BonusPeriodicFixed(terms)
                | SourceKind::Rent(terms) => terms.annual_amount = amount,
                SourceKind::Budget(terms) => terms.annual_amount = amount,
                _ => {}
            }
        }
        self
    }
}
