use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Person,
    Company,
    Account,
}

/// A payer, payee, owner or sink referenced by sources and assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn person(id: &str, name: &str) -> Self {
        Self {
            id: EntityId::from(id),
            name: name.to_string(),
            kind: EntityKind::Person,
        }
    }

    pub fn company(id: &str, name: &str) -> Self {
        Self {
            id: EntityId::from(id),
            name: name.to_string(),
            kind: EntityKind::Company,
        }
    }

    pub fn account(id: &str, name: &str) -> Self {
        Self {
            id: EntityId::from(id),
            name: name.to_string(),
            kind: EntityKind::Account,
        }
    }
}

/// Economic assumptions shared by every source of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assumptions {
    /// Annual return used to extrapolate security prices and grow assets
    pub long_term_return: Decimal,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            long_term_return: Decimal::new(7, 2),
        }
    }
}
