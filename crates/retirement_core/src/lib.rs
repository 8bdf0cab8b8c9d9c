//! Personal cash-flow projection library
//!
//! This crate projects a household's future cash flows over a multi-year
//! horizon and tracks a running balance for every stream. It supports:
//! - Payment calendars (annual, semi-annual, quarterly, monthly, semi-monthly,
//!   biweekly and vesting schedules) with pro-rated partial periods
//! - Salary, bonuses, rent, budget lines, loans, equity vesting, Smith-Ostler
//!   alimony and progressive income tax
//! - Dependency-ordered evaluation, so derived sources see the completed
//!   output of the sources they read
//! - Loan amortization and share balances
//! - Yearly reporting, asset valuation and net worth
//!
//! # Builder DSL
//!
//! Use the fluent builder API for ergonomic scenario setup:
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
//!     .source(SourceBuilder::salary("paycheck", dec!(120000))
//!         .frequency("monthly")
//!         .paid_by("acme")
//!         .paid_to("pat")
//!         .sink("checking"))
//!     .build()?;
//!
//! let index = scenario.index()?;
//! println!("{}", index.annual_total(&"paycheck".into(), 2015));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod batch;
pub mod date_math;
pub mod error;
pub mod frequency;
pub mod index;
pub mod market;
pub mod money;
pub mod scenario;
pub mod scheduler;
pub mod snapshot;
pub mod sources;
pub mod taxes;
pub mod tracker;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use batch::{project_all, ScenarioSummary};
pub use config::{ScenarioBuilder, ScenarioConfig, SourceBuilder};
pub use error::{ComputeError, ComputeResult, ConfigError, ConfigResult};
pub use frequency::{ApportionmentPeriod, Frequency, FrequencyRule, Vesting};
pub use index::{ProjectionIndex, YearSummary};
pub use market::{Asset, Security};
pub use scenario::{Scenario, ScenarioContext};
pub use scheduler::{CompatibilityRisk, DependencyGraph, Projection, Stage};
pub use snapshot::Snapshot;
pub use sources::{CashFlowSource, ProjectionWarning, SourceKind};
