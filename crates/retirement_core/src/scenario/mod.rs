//! Scenarios
//!
//! A [`Scenario`] owns its validated context and evaluation plan. The
//! projection runs the first time the index is asked for and is cached
//! from then on.

mod context;

pub use context::ScenarioContext;

use std::sync::OnceLock;

use crate::config::ScenarioConfig;
use crate::error::ConfigResult;
use crate::index::ProjectionIndex;
use crate::scheduler::{evaluate, DependencyGraph, Projection};

#[derive(Debug)]
pub struct Scenario {
    context: ScenarioContext,
    graph: DependencyGraph,
    index: OnceLock<ConfigResult<ProjectionIndex>>,
}

impl Scenario {
    /// Validate `config` and plan its evaluation.
    ///
    /// Every configuration error, including dependency cycles, is reported
    /// here; nothing is evaluated yet.
    pub fn from_config(config: ScenarioConfig) -> ConfigResult<Self> {
        let context = ScenarioContext::from_config(config)?;
        let graph = DependencyGraph::build(context.sources())?;
        tracing::debug!(
            scenario = context.id(),
            sources = context.sources().len(),
            layers = graph.layers().len(),
            "Scenario planned"
        );
        Ok(Self {
            context,
            graph,
            index: OnceLock::new(),
        })
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Run a fresh evaluation, bypassing the cached index.
    pub fn evaluate(&self) -> ConfigResult<Projection> {
        evaluate(&self.context, &self.graph)
    }

    /// The projection index, evaluating the scenario on first use.
    pub fn index(&self) -> ConfigResult<&ProjectionIndex> {
        self.index
            .get_or_init(|| {
                let projection = self.evaluate()?;
                Ok(ProjectionIndex::new(projection, &self.context))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn is_evaluated(&self) -> bool {
        self.index.get().is_some()
    }
}
