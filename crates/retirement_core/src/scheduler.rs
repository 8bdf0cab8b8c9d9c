//! Staged evaluation of sources
//!
//! Sources form a dependency graph. Every source depends on all sources of
//! strictly earlier stages, which reproduces the four-stage pipeline, plus
//! its explicit `depends_on` list and any source it reads by reference. A
//! layered topological sort turns the graph into evaluation layers; each
//! layer reads a snapshot of history plus all earlier layers, and its output
//! joins the pool only once the whole layer has been evaluated.
//!
//! Estimates of periods paid on or before the as-of date stay in the pool so
//! later layers see a complete year, but only imported history and future
//! instances are published. An estimate for a payment the history already
//! records is left out of the pool.
//!
//! A dependency on a source of the same or a later stage is honoured but
//! reported as a [`CompatibilityRisk`]: a strict stage pipeline would have
//! shown that source stale data.

use std::fmt;

use jiff::civil::Date;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{CashFlowInstance, SourceId};
use crate::scenario::ScenarioContext;
use crate::snapshot::Snapshot;
use crate::sources::{CashFlowSource, ProjectionWarning};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    BaseCashFlows = 1,
    DerivedIncome = 2,
    DerivedExpenses = 3,
    Taxes = 4,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::BaseCashFlows,
        Stage::DerivedIncome,
        Stage::DerivedExpenses,
        Stage::Taxes,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BaseCashFlows => "BASE_CASH_FLOWS",
            Stage::DerivedIncome => "DERIVED_INCOME",
            Stage::DerivedExpenses => "DERIVED_EXPENSES",
            Stage::Taxes => "TAXES",
        };
        f.write_str(name)
    }
}

/// A dependency that a strict stage pipeline would not have satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRisk {
    pub source_id: SourceId,
    pub source_stage: Stage,
    pub dependency: SourceId,
    pub dependency_stage: Stage,
}

impl fmt::Display for CompatibilityRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) depends on {} ({}), which is not in an earlier stage",
            self.source_id, self.source_stage, self.dependency, self.dependency_stage
        )
    }
}

/// Evaluation plan: layers of source indices in dependency order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    layers: Vec<Vec<usize>>,
    risks: Vec<CompatibilityRisk>,
}

impl DependencyGraph {
    /// Build the plan, rejecting unknown dependencies and cycles.
    pub fn build(sources: &[CashFlowSource]) -> ConfigResult<Self> {
        let index: FxHashMap<&SourceId, usize> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| (&s.id, i))
            .collect();

        let mut deps: Vec<Vec<usize>> = vec![Vec::new(); sources.len()];
        let mut risks = Vec::new();

        for (i, source) in sources.iter().enumerate() {
            let stage = source.stage();
            for (j, other) in sources.iter().enumerate() {
                if other.stage() < stage {
                    deps[i].push(j);
                }
            }
            for dep_id in source.dependencies() {
                let &j = index.get(dep_id).ok_or_else(|| ConfigError::UnknownSource {
                    source_id: source.id.clone(),
                    target: dep_id.clone(),
                })?;
                let dep_stage = sources[j].stage();
                if dep_stage >= stage {
                    let risk = CompatibilityRisk {
                        source_id: source.id.clone(),
                        source_stage: stage,
                        dependency: dep_id.clone(),
                        dependency_stage: dep_stage,
                    };
                    warn!(risk = %risk, "Compatibility risk");
                    risks.push(risk);
                }
                if !deps[i].contains(&j) {
                    deps[i].push(j);
                }
            }
        }

        let layers = layered_sort(sources, &deps)?;
        Ok(Self { layers, risks })
    }

    pub fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    pub fn risks(&self) -> &[CompatibilityRisk] {
        &self.risks
    }

    /// Layers as source ids, for reporting.
    pub fn layer_ids(&self, sources: &[CashFlowSource]) -> Vec<Vec<SourceId>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(|&i| sources[i].id.clone()).collect())
            .collect()
    }
}

/// Kahn's algorithm, one layer per round. Within a layer sources keep
/// their configuration order.
fn layered_sort(sources: &[CashFlowSource], deps: &[Vec<usize>]) -> ConfigResult<Vec<Vec<usize>>> {
    let n = deps.len();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for (i, node_deps) in deps.iter().enumerate() {
        in_degree[i] = node_deps.len();
        for &j in node_deps {
            dependents[j].push(i);
        }
    }

    let mut layers = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut placed = 0;

    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &k in &dependents[i] {
                in_degree[k] -= 1;
                if in_degree[k] == 0 {
                    next.push(k);
                }
            }
        }
        next.sort_unstable();
        placed += current.len();
        layers.push(current);
        current = next;
    }

    if placed < n {
        return Err(ConfigError::DependencyCycle(find_cycle(sources, deps, &in_degree)));
    }
    Ok(layers)
}

/// Follow unplaced dependencies from an unplaced source until one repeats.
fn find_cycle(sources: &[CashFlowSource], deps: &[Vec<usize>], in_degree: &[usize]) -> Vec<SourceId> {
    let unplaced = |i: usize| in_degree[i] > 0;
    let Some(mut node) = (0..deps.len()).find(|&i| unplaced(i)) else {
        return Vec::new();
    };

    let mut path: Vec<usize> = Vec::new();
    loop {
        if let Some(pos) = path.iter().position(|&p| p == node) {
            let mut cycle: Vec<SourceId> =
                path[pos..].iter().map(|&i| sources[i].id.clone()).collect();
            cycle.push(sources[node].id.clone());
            return cycle;
        }
        path.push(node);
        match deps[node].iter().copied().find(|&j| unplaced(j)) {
            Some(next) => node = next,
            None => return path.iter().map(|&i| sources[i].id.clone()).collect(),
        }
    }
}

/// Result of evaluating every source of a scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// History and projected instances, sorted by payment date
    pub instances: Vec<CashFlowInstance>,
    pub warnings: Vec<ProjectionWarning>,
    pub risks: Vec<CompatibilityRisk>,
    pub layers: Vec<Vec<SourceId>>,
}

/// Evaluate all sources layer by layer.
pub fn evaluate(ctx: &ScenarioContext, graph: &DependencyGraph) -> ConfigResult<Projection> {
    let sources = ctx.sources();
    let history: Vec<CashFlowInstance> = ctx
        .history()
        .iter()
        .cloned()
        .map(|mut instance| {
            instance.historical = true;
            instance
        })
        .collect();
    let recorded: FxHashSet<(&SourceId, Date)> = ctx
        .history()
        .iter()
        .map(|i| (&i.source_id, i.payment_date))
        .collect();

    let mut pool = history.clone();
    let mut published = history;
    let mut warnings = Vec::new();

    for (depth, layer) in graph.layers().iter().enumerate() {
        let outputs = {
            let snapshot = Snapshot::new(&pool);
            layer
                .iter()
                .map(|&i| {
                    let source = &sources[i];
                    debug!(
                        layer = depth,
                        source = %source.id,
                        stage = %source.stage(),
                        "Evaluating source"
                    );
                    source.project(ctx, &snapshot)
                })
                .collect::<ConfigResult<Vec<_>>>()?
        };

        for output in outputs {
            for warning in &output.warnings {
                warn!(
                    source = %warning.source_id,
                    payment_date = %warning.payment_date,
                    error = %warning.error,
                    "Skipped period"
                );
            }
            pool.extend(
                output
                    .settled
                    .into_iter()
                    .filter(|i| !recorded.contains(&(&i.source_id, i.payment_date))),
            );
            pool.extend(output.instances.iter().cloned());
            published.extend(output.instances);
            warnings.extend(output.warnings);
        }
    }

    published.sort_by_key(|i| i.payment_date);
    info!(
        scenario = ctx.id(),
        instances = published.len(),
        settled = pool.len() - published.len(),
        warnings = warnings.len(),
        layers = graph.layers().len(),
        "Projection complete"
    );

    Ok(Projection {
        instances: published,
        warnings,
        risks: graph.risks().to_vec(),
        layers: graph.layer_ids(sources),
    })
}
