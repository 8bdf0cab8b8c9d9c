//! Per-scenario registry
//!
//! Everything a source may look up while projecting lives here: entities,
//! frequencies, sources, securities, assets, the tax table, assumptions and
//! imported history. The context is built once from a [`ScenarioConfig`] and
//! validated up front, so a broken reference is reported before any source
//! runs.

use jiff::civil::Date;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::ScenarioConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::frequency::{Frequency, FrequencyRule};
use crate::market::{Asset, Security};
use crate::model::{
    AssetId, Assumptions, CashFlowInstance, Entity, EntityId, FrequencyId, SecurityId, SourceId,
    TaxTable,
};
use crate::sources::{CashFlowSource, SourceKind};

#[derive(Debug, Clone)]
pub struct ScenarioContext {
    id: String,
    name: String,
    as_of: Date,
    horizon_end: Date,
    assumptions: Assumptions,
    entities: FxHashMap<EntityId, Entity>,
    frequencies: FxHashMap<FrequencyId, Frequency>,
    sources: Vec<CashFlowSource>,
    source_index: FxHashMap<SourceId, usize>,
    securities: FxHashMap<SecurityId, Security>,
    assets: Vec<Asset>,
    tax_table: TaxTable,
    history: Vec<CashFlowInstance>,
}

impl ScenarioContext {
    pub fn from_config(config: ScenarioConfig) -> ConfigResult<Self> {
        let ScenarioConfig {
            id,
            name,
            as_of,
            horizon_end,
            assumptions,
            entities,
            frequencies,
            sources,
            securities,
            assets,
            tax_table,
            history,
        } = config;

        let entities = unique_by_id("entity", entities, |e| e.id.clone())?;
        let frequencies = unique_by_id("frequency", frequencies, |f| f.id.clone())?;
        let securities = unique_by_id("security", securities, |s| s.id.clone())?;

        let mut source_index = FxHashMap::default();
        for (i, source) in sources.iter().enumerate() {
            if source_index.insert(source.id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateId {
                    kind: "source",
                    id: source.id.to_string(),
                });
            }
        }
        let mut asset_ids: FxHashSet<&AssetId> = FxHashSet::default();
        for asset in &assets {
            if !asset_ids.insert(&asset.id) {
                return Err(ConfigError::DuplicateId {
                    kind: "asset",
                    id: asset.id.to_string(),
                });
            }
        }

        let horizon_end = horizon_end
            .or_else(|| frequencies.values().map(|f| f.accrue_end).max())
            .unwrap_or(as_of)
            .max(as_of);

        let ctx = Self {
            id,
            name,
            as_of,
            horizon_end,
            assumptions,
            entities,
            frequencies,
            sources,
            source_index,
            securities,
            assets,
            tax_table,
            history,
        };
        ctx.validate()?;
        Ok(ctx)
    }

    fn validate(&self) -> ConfigResult<()> {
        for frequency in self.frequencies.values() {
            frequency.validate()?;
        }
        for source in &self.sources {
            self.validate_source(source)?;
        }
        for asset in &self.assets {
            for owner in &asset.owners {
                self.require_entity(format!("asset {}", asset.id), owner)?;
            }
            if asset
                .interim_balances
                .iter()
                .any(|b| b.date < asset.initial_balance.date)
            {
                return Err(ConfigError::InvalidAsset {
                    id: asset.id.clone(),
                    reason: "valuation precedes the initial balance".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_source(&self, source: &CashFlowSource) -> ConfigResult<()> {
        let frequency = self.frequency_for(source, &source.frequency)?;
        let referrer = || format!("source {}", source.id);

        self.require_entity(referrer(), &source.sink)?;
        for entity in source.payers.iter().chain(&source.payees) {
            self.require_entity(referrer(), entity)?;
        }
        for dep in &source.depends_on {
            self.require_source(source, dep)?;
        }

        match &source.kind {
            SourceKind::BonusAnnualPct(terms) => {
                let salary = self.require_source(source, &terms.salary)?;
                if !matches!(salary.kind, SourceKind::Salary(_)) {
                    return Err(ConfigError::WrongSourceKind {
                        source_id: source.id.clone(),
                        expected: "salary",
                        actual: terms.salary.clone(),
                    });
                }
            }
            SourceKind::Loan(_) => {
                if matches!(frequency.rule, FrequencyRule::VestingSchedule { .. }) {
                    return Err(ConfigError::NonPeriodicFrequency {
                        source_id: source.id.clone(),
                        frequency: frequency.id.clone(),
                    });
                }
            }
            SourceKind::Equity(terms) => {
                self.security_for(source, &terms.security)?;
            }
            SourceKind::Alimony(terms) => {
                self.frequency_for(source, &terms.smith_ostler_frequency)?;
                if let Some(excess) = &terms.excess_sink {
                    self.require_entity(referrer(), excess)?;
                }
                self.require_payer(source, "payor")?;
            }
            SourceKind::IncomeTax => {
                self.require_payer(source, "taxpayer")?;
            }
            SourceKind::Salary(_)
            | SourceKind::BonusPeriodicFixed(_)
            | SourceKind::Rent(_)
            | SourceKind::Budget(_) => {}
        }
        Ok(())
    }

    fn require_entity(&self, referrer: String, entity: &EntityId) -> ConfigResult<()> {
        if self.entities.contains_key(entity) {
            Ok(())
        } else {
            Err(ConfigError::UnknownEntity {
                referrer,
                entity: entity.clone(),
            })
        }
    }

    fn require_source(&self, source: &CashFlowSource, target: &SourceId) -> ConfigResult<&CashFlowSource> {
        self.source(target).ok_or_else(|| ConfigError::UnknownSource {
            source_id: source.id.clone(),
            target: target.clone(),
        })
    }

    fn require_payer(&self, source: &CashFlowSource, role: &'static str) -> ConfigResult<()> {
        if source.payers.is_empty() {
            Err(ConfigError::MissingParty {
                source_id: source.id.clone(),
                role,
            })
        } else {
            Ok(())
        }
    }

    /// Frequency `id` as referenced by `source`.
    pub fn frequency_for(&self, source: &CashFlowSource, id: &FrequencyId) -> ConfigResult<&Frequency> {
        self.frequencies
            .get(id)
            .ok_or_else(|| ConfigError::UnknownFrequency {
                source_id: source.id.clone(),
                frequency: id.clone(),
            })
    }

    /// Security `id` as referenced by `source`.
    pub fn security_for(&self, source: &CashFlowSource, id: &SecurityId) -> ConfigResult<&Security> {
        self.securities
            .get(id)
            .ok_or_else(|| ConfigError::UnknownSecurity {
                source_id: source.id.clone(),
                security: id.clone(),
            })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scenario's "now": instances paid on or before it are not projected.
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Last date asset valuations are extended to.
    pub fn horizon_end(&self) -> Date {
        self.horizon_end
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn frequency(&self, id: &FrequencyId) -> Option<&Frequency> {
        self.frequencies.get(id)
    }

    pub fn source(&self, id: &SourceId) -> Option<&CashFlowSource> {
        self.source_index.get(id).map(|&i| &self.sources[i])
    }

    /// Sources in configuration order.
    pub fn sources(&self) -> &[CashFlowSource] {
        &self.sources
    }

    pub fn security(&self, id: &SecurityId) -> Option<&Security> {
        self.securities.get(id)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    pub fn tax_table(&self) -> &TaxTable {
        &self.tax_table
    }

    pub fn history(&self) -> &[CashFlowInstance] {
        &self.history
    }
}

fn unique_by_id<T, K, F>(kind: &'static str, items: Vec<T>, key: F) -> ConfigResult<FxHashMap<K, T>>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut map = FxHashMap::default();
    for item in items {
        let id = key(&item);
        if map.contains_key(&id) {
            return Err(ConfigError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        map.insert(id, item);
    }
    Ok(map)
}
