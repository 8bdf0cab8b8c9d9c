use jiff::civil::Date;

use crate::model::{AssetId, EntityId, FrequencyId, SecurityId, SourceId};

/// Errors detected while building a scenario context.
///
/// These are fatal: a scenario with a configuration error is never evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("source {source_id} references unknown frequency {frequency}")]
    UnknownFrequency {
        source_id: SourceId,
        frequency: FrequencyId,
    },

    #[error("{referrer} references unknown entity {entity}")]
    UnknownEntity { referrer: String, entity: EntityId },

    #[error("source {source_id} references unknown source {target}")]
    UnknownSource { source_id: SourceId, target: SourceId },

    #[error("source {source_id} references unknown security {security}")]
    UnknownSecurity {
        source_id: SourceId,
        security: SecurityId,
    },

    #[error("source {source_id} requires {expected} but references {actual}")]
    WrongSourceKind {
        source_id: SourceId,
        expected: &'static str,
        actual: SourceId,
    },

    #[error("source {source_id} cannot use vesting frequency {frequency}: it needs a periodic rate")]
    NonPeriodicFrequency {
        source_id: SourceId,
        frequency: FrequencyId,
    },

    #[error("source {source_id} needs a {role}")]
    MissingParty {
        source_id: SourceId,
        role: &'static str,
    },

    #[error("frequency {id}: {reason}")]
    InvalidFrequency { id: FrequencyId, reason: String },

    #[error("asset {id}: {reason}")]
    InvalidAsset { id: AssetId, reason: String },

    #[error("dependency cycle between sources: {}", join_ids(.0))]
    DependencyCycle(Vec<SourceId>),
}

/// Errors computing a single period of a source.
///
/// The period is skipped and the error is recorded as a warning; the rest of
/// the evaluation continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    #[error("no tax bracket table for year {0}")]
    TaxYearNotFound(i16),

    #[error("no price for security {security} on {date}")]
    PriceUnavailable { security: SecurityId, date: Date },

    #[error("no salary from {salary} in effect on {date}")]
    SalaryUnavailable { salary: SourceId, date: Date },

    #[error("arithmetic overflow")]
    Overflow,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub type ComputeResult<T> = std::result::Result<T, ComputeError>;

fn join_ids(ids: &[SourceId]) -> String {
    ids.iter()
        .map(SourceId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
