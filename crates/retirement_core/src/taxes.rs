//! Progressive income tax calculation
//!
//! Brackets are walked from the highest start down. Income above each
//! bracket's start is taxed at that bracket's rate and removed from the
//! remaining income before the next (lower) bracket is considered.

use rust_decimal::Decimal;

use crate::error::{ComputeError, ComputeResult};
use crate::model::{TaxBracket, TaxTable};
use crate::money::{checked_add, checked_mul, checked_sub, round_cents};

/// Tax owed on `income` for brackets sorted by descending start.
///
/// Returns a positive amount rounded to cents; zero or negative income owes
/// nothing.
pub fn calculate_income_tax(income: Decimal, brackets: &[TaxBracket]) -> ComputeResult<Decimal> {
    if income <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let mut tax = Decimal::ZERO;
    let mut remaining = income;

    for bracket in brackets {
        let marginal = checked_sub(remaining, bracket.start)?;
        if marginal > Decimal::ZERO {
            tax = checked_add(tax, checked_mul(marginal, bracket.rate)?)?;
            remaining -= marginal;
        }
    }

    Ok(round_cents(tax))
}

/// Look up `year` in the table and compute the tax owed.
pub fn tax_for_year(table: &TaxTable, year: i16, income: Decimal) -> ComputeResult<Decimal> {
    let brackets = table
        .brackets(year)
        .ok_or(ComputeError::TaxYearNotFound(year))?;
    calculate_income_tax(income, brackets)
}
