//! Loan amortization
//!
//! Secured and revolving loans share one schedule: interest accrues on the
//! prior balance at the periodic rate, the rest of the payment (less any
//! impound) reduces principal. Principal is clamped to the outstanding
//! balance so the balance never goes negative, and a paid-off loan emits
//! nothing further.

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::{project_periods, CashFlowSource, LoanKind, LoanTerms, SourceOutput};
use crate::error::{ComputeResult, ConfigError, ConfigResult};
use crate::frequency::Frequency;
use crate::model::{LoanSplit, Period};
use crate::money::{checked_add, checked_mul, checked_sub, div_round, round_cents, PORTION_SCALE};

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// `annual_rate_percent / 100 / periods_per_year` at 10 places.
pub(crate) fn periodic_rate(annual_rate_percent: Decimal, periods_per_year: u32) -> Decimal {
    div_round(
        annual_rate_percent / PERCENT,
        Decimal::from(periods_per_year),
        PORTION_SCALE,
    )
}

/// Split one payment against `prior_balance`.
pub(crate) fn amortize(terms: &LoanTerms, rate: Decimal, prior_balance: Decimal) -> ComputeResult<LoanSplit> {
    let interest = checked_mul(prior_balance, rate).map(round_cents)?;
    let impound = match terms.kind {
        LoanKind::Secured => terms.impound,
        LoanKind::Revolving => Decimal::ZERO,
    };
    let principal = round_cents(checked_sub(checked_sub(terms.payment, impound)?, interest)?)
        .max(Decimal::ZERO)
        .min(prior_balance);
    let balance = prior_balance - principal;
    debug_assert!(balance >= Decimal::ZERO, "loan balance went negative");

    Ok(LoanSplit {
        principal,
        interest,
        impound,
        balance,
    })
}

pub(super) fn project(
    source: &CashFlowSource,
    terms: &LoanTerms,
    frequency: &Frequency,
    periods: &[Period],
    as_of: Date,
) -> ConfigResult<SourceOutput> {
    let periods_per_year =
        frequency
            .periods_per_year()
            .ok_or_else(|| ConfigError::NonPeriodicFrequency {
                source_id: source.id.clone(),
                frequency: frequency.id.clone(),
            })?;
    let rate = periodic_rate(terms.annual_rate_percent, periods_per_year);

    Ok(project_periods(source, periods, as_of, |period, prior| {
        let prior_balance = prior
            .and_then(|p| p.loan)
            .map_or(terms.starting_balance, |split| split.balance);
        if prior_balance <= Decimal::ZERO {
            return Ok(None);
        }

        let split = amortize(terms, rate, prior_balance)?;
        let paid = checked_add(checked_add(split.principal, split.interest)?, split.impound)?;
        let mut instance = source.instance(period, -paid);
        instance.running_balance = split.balance;
        instance.loan = Some(split);
        instance.description = format!(
            "principal {} interest {} balance {}",
            split.principal, split.interest, split.balance
        );
        Ok(Some(instance))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::sources::SourceKind;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    fn terms(kind: LoanKind, balance: Decimal, payment: Decimal, impound: Decimal) -> LoanTerms {
        LoanTerms {
            kind,
            annual_rate_percent: dec!(3.875),
            starting_balance: balance,
            payment,
            impound,
        }
    }

    #[test]
    fn test_periodic_rate() {
        assert_eq!(periodic_rate(dec!(3.875), 12), dec!(0.0032291667));
    }

    #[test]
    fn test_first_payment_split() {
        let t = terms(LoanKind::Secured, dec!(50000.00), dec!(500.00), dec!(0.00));
        let split = amortize(&t, periodic_rate(t.annual_rate_percent, 12), t.starting_balance).unwrap();
        assert_eq!(split.interest, dec!(161.46));
        assert_eq!(split.principal, dec!(338.54));
        assert_eq!(split.balance, dec!(49661.46));
    }

    #[test]
    fn test_impound_reduces_principal() {
        let t = terms(LoanKind::Secured, dec!(50000.00), dec!(700.00), dec!(200.00));
        let split = amortize(&t, periodic_rate(t.annual_rate_percent, 12), t.starting_balance).unwrap();
        assert_eq!(split.impound, dec!(200.00));
        assert_eq!(split.principal, dec!(338.54));
    }

    #[test]
    fn test_final_payment_is_clamped() {
        let t = terms(LoanKind::Revolving, dec!(100.00), dec!(500.00), dec!(50.00));
        let split = amortize(&t, periodic_rate(t.annual_rate_percent, 12), t.starting_balance).unwrap();
        // Revolving ignores impound and pays no more than balance + interest
        assert_eq!(split.impound, Decimal::ZERO);
        assert_eq!(split.interest, dec!(0.32));
        assert_eq!(split.principal, dec!(100.00));
        assert_eq!(split.balance, Decimal::ZERO);
    }

    #[test]
    fn test_stops_after_payoff() {
        let t = terms(LoanKind::Secured, dec!(1000.00), dec!(400.00), Decimal::ZERO);
        let source = CashFlowSource::new("loan", "monthly", "checking", SourceKind::Loan(t.clone()));
        let frequency =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 12, 31), date(2015, 1, 31));
        let output =
            project(&source, &t, &frequency, &frequency.periods(), date(2014, 12, 31)).unwrap();

        assert_eq!(output.instances.len(), 3);
        let last = output.instances.last().unwrap();
        assert_eq!(last.running_balance, Decimal::ZERO);
        for instance in &output.instances {
            let split = instance.loan.unwrap();
            assert!(split.balance >= Decimal::ZERO);
            assert!(instance.amount < Decimal::ZERO);
            assert_eq!(instance.amount, -(split.principal + split.interest + split.impound));
        }
    }

    #[test]
    fn test_overflowing_payment_is_a_warning() {
        let t = terms(LoanKind::Secured, dec!(1000.00), Decimal::MAX, Decimal::MIN);
        let source = CashFlowSource::new("loan", "monthly", "checking", SourceKind::Loan(t.clone()));
        let frequency =
            Frequency::monthly("monthly", date(2015, 1, 1), date(2015, 3, 31), date(2015, 1, 31));
        let output =
            project(&source, &t, &frequency, &frequency.periods(), date(2014, 12, 31)).unwrap();

        assert!(output.instances.is_empty());
        assert_eq!(output.warnings.len(), 3);
        assert!(output.warnings.iter().all(|w| w.error == ComputeError::Overflow));
    }

    #[test]
    fn test_vesting_frequency_is_rejected() {
        let t = terms(LoanKind::Secured, dec!(1000.00), dec!(400.00), Decimal::ZERO);
        let source = CashFlowSource::new("loan", "vest", "checking", SourceKind::Loan(t.clone()));
        let frequency = Frequency::vesting_schedule("vest", date(2015, 1, 1), Vec::new());
        let err = project(&source, &t, &frequency, &[], date(2014, 12, 31)).unwrap_err();
        assert!(matches!(err, ConfigError::NonPeriodicFrequency { .. }));
    }
}
