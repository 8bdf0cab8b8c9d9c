mod balance;
mod entity;
mod ids;
mod instance;
mod period;
mod tax_table;

pub use balance::{Balance, CashBalance, ShareBalance};
pub use entity::{Assumptions, Entity, EntityKind};
pub use ids::{AssetId, EntityId, FrequencyId, SecurityId, SourceId};
pub use instance::{CashFlowInstance, ItemType, LoanSplit};
pub use period::Period;
pub use tax_table::{TaxBracket, TaxTable};
