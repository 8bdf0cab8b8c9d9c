//! Source Builder DSL
//!
//! Provides a fluent API for creating cash-flow sources.
//!
//! # Examples
//!
//! ```ignore
//! use retirement_core::config::SourceBuilder;
//!
//! // Monthly salary deposited to checking
//! let salary = SourceBuilder::salary("paycheck", dec!(120000))
//!     .frequency("monthly")
//!     .paid_by("acme")
//!     .paid_to("pat")
//!     .sink("checking");
//!
//! // Mortgage with an escrow impound
//! let mortgage = SourceBuilder::secured_loan("mortgage", dec!(3.875), dec!(350000), dec!(2400))
//!     .impound(dec!(650))
//!     .frequency("monthly")
//!     .paid_by("pat")
//!     .sink("checking");
//! ```

use rust_decimal::Decimal;

use crate::model::{EntityId, FrequencyId, ItemType, SecurityId, SourceId};
use crate::scheduler::Stage;
use crate::sources::{
    AlimonyTerms, BudgetTerms, CashFlowSource, EquityKind, EquityTerms, FixedAmount, LoanKind,
    LoanTerms, PercentOfSalary, SourceKind,
};

/// Builder for creating sources with a fluent API
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    source: CashFlowSource,
}

impl SourceBuilder {
    fn new(id: &str, kind: SourceKind) -> Self {
        Self {
            source: CashFlowSource::new(id, "", "", kind),
        }
    }

    // =========================================================================
    // Kinds
    // =========================================================================

    pub fn salary(id: &str, annual_amount: Decimal) -> Self {
        Self::new(id, SourceKind::Salary(FixedAmount { annual_amount }))
    }

    /// Bonus of `bonus_percent` (a fraction) of the salary source's current
    /// annual amount
    pub fn bonus_percent(id: &str, salary: &str, bonus_percent: Decimal) -> Self {
        Self::new(
            id,
            SourceKind::BonusAnnualPct(PercentOfSalary {
                salary: SourceId::from(salary),
                bonus_percent,
            }),
        )
    }

    pub fn bonus_fixed(id: &str, annual_amount: Decimal) -> Self {
        Self::new(id, SourceKind::BonusPeriodicFixed(FixedAmount { annual_amount }))
    }

    pub fn rent(id: &str, annual_amount: Decimal) -> Self {
        Self::new(id, SourceKind::Rent(FixedAmount { annual_amount }))
    }

    pub fn budget(id: &str, category: &str, annual_amount: Decimal, item_type: ItemType) -> Self {
        Self::new(
            id,
            SourceKind::Budget(BudgetTerms {
                category: category.to_string(),
                parent_category: "Budget".to_string(),
                annual_amount,
                item_type,
            }),
        )
    }

    pub fn secured_loan(
        id: &str,
        annual_rate_percent: Decimal,
        starting_balance: Decimal,
        payment: Decimal,
    ) -> Self {
        Self::loan(id, LoanKind::Secured, annual_rate_percent, starting_balance, payment)
    }

    pub fn revolving_loan(
        id: &str,
        annual_rate_percent: Decimal,
        starting_balance: Decimal,
        payment: Decimal,
    ) -> Self {
        Self::loan(id, LoanKind::Revolving, annual_rate_percent, starting_balance, payment)
    }

    fn loan(
        id: &str,
        kind: LoanKind,
        annual_rate_percent: Decimal,
        starting_balance: Decimal,
        payment: Decimal,
    ) -> Self {
        Self::new(
            id,
            SourceKind::Loan(LoanTerms {
                kind,
                annual_rate_percent,
                starting_balance,
                payment,
                impound: Decimal::ZERO,
            }),
        )
    }

    pub fn rsu(id: &str, security: &str, total_units: Decimal) -> Self {
        Self::equity(id, EquityKind::Rsu, security, total_units, Decimal::ZERO)
    }

    pub fn stock_option(id: &str, security: &str, total_units: Decimal, strike_price: Decimal) -> Self {
        Self::equity(id, EquityKind::StockOption, security, total_units, strike_price)
    }

    fn equity(
        id: &str,
        kind: EquityKind,
        security: &str,
        total_units: Decimal,
        strike_price: Decimal,
    ) -> Self {
        Self::new(
            id,
            SourceKind::Equity(EquityTerms {
                kind,
                security: SecurityId::from(security),
                total_units,
                strike_price,
            }),
        )
    }

    /// Smith-Ostler alimony: `base_alimony` every base period plus
    /// `rate` of payor income above `base_income` every override period
    pub fn alimony(
        id: &str,
        base_income: Decimal,
        base_alimony: Decimal,
        rate: Decimal,
        smith_ostler_frequency: &str,
    ) -> Self {
        Self::new(
            id,
            SourceKind::Alimony(AlimonyTerms {
                base_income,
                base_alimony,
                smith_ostler_rate: rate,
                max_alimony: None,
                smith_ostler_frequency: FrequencyId::from(smith_ostler_frequency),
                excess_sink: None,
            }),
        )
    }

    pub fn income_tax(id: &str) -> Self {
        Self::new(id, SourceKind::IncomeTax)
    }

    // =========================================================================
    // Wiring
    // =========================================================================

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.source.name = name.into();
        self
    }

    #[must_use]
    pub fn frequency(mut self, frequency: &str) -> Self {
        self.source.frequency = FrequencyId::from(frequency);
        self
    }

    #[must_use]
    pub fn paid_by(mut self, payer: &str) -> Self {
        self.source.payers.push(EntityId::from(payer));
        self
    }

    #[must_use]
    pub fn paid_to(mut self, payee: &str) -> Self {
        self.source.payees.push(EntityId::from(payee));
        self
    }

    /// Account receiving or paying the amounts
    #[must_use]
    pub fn sink(mut self, sink: &str) -> Self {
        self.source.sink = EntityId::from(sink);
        self
    }

    /// Override the kind's default stage
    #[must_use]
    pub fn stage(mut self, stage: Stage) -> Self {
        self.source.stage = Some(stage);
        self
    }

    #[must_use]
    pub fn depends_on(mut self, source: &str) -> Self {
        self.source.depends_on.push(SourceId::from(source));
        self
    }

    // =========================================================================
    // Kind-specific options (ignored by other kinds)
    // =========================================================================

    #[must_use]
    pub fn impound(mut self, impound: Decimal) -> Self {
        if let SourceKind::Loan(terms) = &mut self.source.kind {
            terms.impound = impound;
        }
        self
    }

    #[must_use]
    pub fn max_alimony(mut self, max: Decimal) -> Self {
        if let SourceKind::Alimony(terms) = &mut self.source.kind {
            terms.max_alimony = Some(max);
        }
        self
    }

    #[must_use]
    pub fn excess_sink(mut self, sink: &str) -> Self {
        if let SourceKind::Alimony(terms) = &mut self.source.kind {
            terms.excess_sink = Some(EntityId::from(sink));
        }
        self
    }

    #[must_use]
    pub fn parent_category(mut self, parent: &str) -> Self {
        if let SourceKind::Budget(terms) = &mut self.source.kind {
            terms.parent_category = parent.to_string();
        }
        self
    }

    pub fn build(self) -> CashFlowSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_salary_builder() {
        let source = SourceBuilder::salary("paycheck", dec!(120000))
            .name("Acme paycheck")
            .frequency("monthly")
            .paid_by("acme")
            .paid_to("pat")
            .sink("checking")
            .build();
        assert_eq!(source.id, SourceId::from("paycheck"));
        assert_eq!(source.name, "Acme paycheck");
        assert_eq!(source.owner(), Some(&EntityId::from("pat")));
        assert_eq!(source.stage(), Stage::BaseCashFlows);
    }

    #[test]
    fn test_kind_specific_options() {
        let loan = SourceBuilder::secured_loan("mortgage", dec!(3.875), dec!(50000), dec!(500))
            .impound(dec!(150))
            .max_alimony(dec!(1))
            .build();
        match loan.kind {
            SourceKind::Loan(terms) => assert_eq!(terms.impound, dec!(150)),
            other => panic!("expected loan, got {other:?}"),
        }

        let alimony = SourceBuilder::alimony("alimony", dec!(50000), dec!(1200), dec!(0.33), "quarterly")
            .max_alimony(dec!(102500))
            .excess_sink("spending")
            .build();
        assert_eq!(alimony.stage(), Stage::DerivedExpenses);
        match alimony.kind {
            SourceKind::Alimony(terms) => {
                assert_eq!(terms.max_alimony, Some(dec!(102500)));
                assert_eq!(terms.excess_sink, Some(EntityId::from("spending")));
            }
            other => panic!("expected alimony, got {other:?}"),
        }
    }
}
