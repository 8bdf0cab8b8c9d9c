//! Scenario Builder
//!
//! The ScenarioBuilder provides a fluent API for assembling a scenario
//! configuration and validating it in one step.
//!
//! # Example
//!
//! ```ignore
//! use retirement_core::config::{ScenarioBuilder, SourceBuilder};
//!
//! let scenario = ScenarioBuilder::new("base")
//!     .as_of(2014, 12, 31)
//!     .person("pat", "Pat")
//!     .account("checking", "Checking")
//!     .frequency(Frequency::annual("yearly", start, end, first_payment))
//!     .tax_year(2015, vec![TaxBracket::new(dec!(0), dec!(0.10))])
//!     .source(SourceBuilder::income_tax("tax").frequency("yearly").paid_by("pat").sink("checking"))
//!     .build()?;
//! ```

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::source_builder::SourceBuilder;
use super::ScenarioConfig;
use crate::error::ConfigResult;
use crate::frequency::Frequency;
use crate::market::{Asset, Security};
use crate::model::{CashFlowInstance, Entity, TaxBracket};
use crate::scenario::Scenario;

/// Builder for creating scenarios
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    config: ScenarioConfig,
}

impl ScenarioBuilder {
    /// Create a new scenario builder, as of the last day of 2014 until set
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            config: ScenarioConfig::new(id, jiff::civil::date(2014, 12, 31)),
        }
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the as-of date (convenience method)
    #[must_use]
    pub fn as_of(mut self, year: i16, month: i8, day: i8) -> Self {
        self.config.as_of = jiff::civil::date(year, month, day);
        self
    }

    /// Set the as-of date using a Date object
    #[must_use]
    pub fn as_of_date(mut self, date: Date) -> Self {
        self.config.as_of = date;
        self
    }

    #[must_use]
    pub fn horizon_end(mut self, year: i16, month: i8, day: i8) -> Self {
        self.config.horizon_end = Some(jiff::civil::date(year, month, day));
        self
    }

    #[must_use]
    pub fn long_term_return(mut self, rate: Decimal) -> Self {
        self.config.assumptions.long_term_return = rate;
        self
    }

    // =========================================================================
    // Entities
    // =========================================================================

    #[must_use]
    pub fn entity(mut self, entity: Entity) -> Self {
        self.config.entities.push(entity);
        self
    }

    #[must_use]
    pub fn person(self, id: &str, name: &str) -> Self {
        self.entity(Entity::person(id, name))
    }

    #[must_use]
    pub fn company(self, id: &str, name: &str) -> Self {
        self.entity(Entity::company(id, name))
    }

    #[must_use]
    pub fn account(self, id: &str, name: &str) -> Self {
        self.entity(Entity::account(id, name))
    }

    // =========================================================================
    // Calendars and sources
    // =========================================================================

    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.config.frequencies.push(frequency);
        self
    }

    #[must_use]
    pub fn source(mut self, builder: SourceBuilder) -> Self {
        self.config.sources.push(builder.build());
        self
    }

    // =========================================================================
    // Market, assets and taxes
    // =========================================================================

    #[must_use]
    pub fn security(mut self, security: Security) -> Self {
        self.config.securities.push(security);
        self
    }

    #[must_use]
    pub fn asset(mut self, asset: Asset) -> Self {
        self.config.assets.push(asset);
        self
    }

    #[must_use]
    pub fn tax_year(mut self, year: i16, brackets: Vec<TaxBracket>) -> Self {
        self.config.tax_table.insert_year(year, brackets);
        self
    }

    /// Seed the projection with an imported instance
    #[must_use]
    pub fn history(mut self, instance: CashFlowInstance) -> Self {
        self.config.history.push(instance);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// The assembled configuration, unvalidated
    pub fn into_config(self) -> ScenarioConfig {
        self.config
    }

    /// Validate and plan the scenario
    pub fn build(self) -> ConfigResult<Scenario> {
        Scenario::from_config(self.config)
    }
}
