//! Realized cash-flow instances
//!
//! A `CashFlowInstance` is one dated, signed amount produced by a source for
//! one period (or seeded from history). Income is positive and expenses are
//! negative; `running_balance` is the source's balance after this amount.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityId, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Income,
    Expense,
    Transfer,
}

/// Interest/principal breakdown of a loan payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSplit {
    pub principal: Decimal,
    pub interest: Decimal,
    pub impound: Decimal,
    /// Outstanding balance after this payment
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowInstance {
    pub source_id: SourceId,
    pub sink_id: EntityId,
    /// Person the amount is attributed to (payee of income, payer of expenses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<EntityId>,
    pub category: String,
    #[serde(default)]
    pub parent_category: String,
    pub item_type: ItemType,
    pub accrual_start: Date,
    pub accrual_end: Date,
    pub payment_date: Date,
    pub amount: Decimal,
    #[serde(default)]
    pub running_balance: Decimal,
    /// Annual amount this instance was apportioned from, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annualized: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanSplit>,
    #[serde(default)]
    pub description: String,
    /// Seeded from imported history rather than projected
    #[serde(default)]
    pub historical: bool,
}

impl CashFlowInstance {
    /// True when the payment date falls within `[start, end]`.
    pub fn is_paid_between(&self, start: Date, end: Date) -> bool {
        self.payment_date >= start && self.payment_date <= end
    }

    pub fn payment_year(&self) -> i16 {
        self.payment_date.year()
    }

    pub fn is_income(&self) -> bool {
        self.item_type == ItemType::Income
    }

    pub fn is_owned_by(&self, entity: &EntityId) -> bool {
        self.owner.as_ref() == Some(entity)
    }
}
