//! Identifiers for scenario entities
//!
//! Each kind of entity has its own id type so a frequency id can never be
//! passed where a source id is expected. Ids are the strings authored in the
//! scenario configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a cash-flow source (salary, loan, tax, ...)
    SourceId
);

string_id!(
    /// Identifier of a payment frequency
    FrequencyId
);

string_id!(
    /// Identifier of a person, company or account. Sinks are entity ids.
    EntityId
);

string_id!(
    /// Identifier of a traded security
    SecurityId
);

string_id!(
    /// Identifier of a valued asset (property, brokerage account, ...)
    AssetId
);
