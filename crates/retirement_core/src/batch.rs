//! Batch projection of independent scenarios
//!
//! Scenarios share no state, so several can be projected at once. With the
//! `parallel` feature they are spread over the rayon pool; each scenario
//! still evaluates sequentially.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::error::ConfigResult;
use crate::index::YearSummary;
use crate::scenario::Scenario;

/// Per-year totals of one projected scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub years: Vec<YearSummary>,
    pub warnings: usize,
    pub risks: usize,
}

impl ScenarioSummary {
    /// Summarize an already-planned scenario, evaluating it if needed.
    pub fn of(scenario: &Scenario) -> ConfigResult<Self> {
        let index = scenario.index()?;
        let ctx = scenario.context();
        Ok(Self {
            id: ctx.id().to_string(),
            name: ctx.name().to_string(),
            years: index
                .years()
                .into_iter()
                .map(|year| index.year_summary(year))
                .collect(),
            warnings: index.warnings().len(),
            risks: index.risks().len(),
        })
    }

    pub fn year(&self, year: i16) -> Option<&YearSummary> {
        self.years.iter().find(|s| s.year == year)
    }
}

/// Project every scenario, in input order.
pub fn project_all(scenarios: &[Scenario]) -> Vec<ConfigResult<ScenarioSummary>> {
    #[cfg(feature = "parallel")]
    let summaries = scenarios.par_iter().map(ScenarioSummary::of).collect();

    #[cfg(not(feature = "parallel"))]
    let summaries = scenarios.iter().map(ScenarioSummary::of).collect();

    summaries
}
