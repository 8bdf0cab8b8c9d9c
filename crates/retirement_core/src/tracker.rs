//! Running balances
//!
//! Cash balances fold signed amounts in payment order, rounding to cents at
//! every step. Loans carry their amortization balance instead and equity
//! sources carry a share balance; both are computed by their sources.

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::error::{ComputeError, ComputeResult};
use crate::model::{CashBalance, CashFlowInstance};
use crate::money::{checked_add, round_cents};

/// Running balance after adding `amount` to the previous instance's balance.
pub fn next_cash_balance(prior: Option<&CashFlowInstance>, amount: Decimal) -> ComputeResult<Decimal> {
    let start = prior.map_or(Decimal::ZERO, |p| p.running_balance);
    checked_add(start, amount).map(round_cents)
}

/// Fold dated amounts (already in chronological order) into a balance
/// after each one.
pub fn fold_cash<I>(amounts: I) -> Vec<CashBalance>
where
    I: IntoIterator<Item = (Date, Decimal)>,
{
    let mut balance: Option<CashBalance> = None;
    amounts
        .into_iter()
        .map(|(date, amount)| {
            let next = match balance {
                Some(b) => b.apply_change(date, amount),
                None => CashBalance::zero(date).apply_change(date, amount),
            };
            balance = Some(next);
            next
        })
        .collect()
}

/// Reassign `running_balance` of instances sorted by payment date.
///
/// An instance whose balance would overflow is removed and returned with
/// its payment date; the balance carries on from the instance before it.
pub fn restate_running_balances(instances: &mut Vec<CashFlowInstance>) -> Vec<(Date, ComputeError)> {
    let mut balance = Decimal::ZERO;
    let mut dropped = Vec::new();
    instances.retain_mut(|instance| match checked_add(balance, instance.amount) {
        Ok(next) => {
            balance = round_cents(next);
            instance.running_balance = balance;
            true
        }
        Err(error) => {
            dropped.push((instance.payment_date, error));
            false
        }
    });
    dropped
}
