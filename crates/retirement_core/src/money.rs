//! Decimal rounding helpers.
//!
//! All monetary and portion math uses `rust_decimal::Decimal` with half-up
//! rounding (ties away from zero) at the scale each rule specifies.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ComputeError, ComputeResult};

/// Scale used for currency amounts and running balances.
pub const CENTS: u32 = 2;

/// Intermediate scale of two-stage portion math.
pub const PORTION_STAGE_ONE: u32 = 4;

/// Final scale of a period portion.
pub const PORTION_SCALE: u32 = 10;

#[inline]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[inline]
pub fn round_cents(value: Decimal) -> Decimal {
    round_half_up(value, CENTS)
}

/// Divide and round half-up to `dp` places.
///
/// Every divisor in period math is a day or period count, so a zero divisor
/// means a malformed frequency; it yields zero rather than a panic and the
/// generator's own checks report it.
#[inline]
pub fn div_round(numerator: Decimal, denominator: Decimal, dp: u32) -> Decimal {
    match numerator.checked_div(denominator) {
        Some(q) => round_half_up(q, dp),
        None => Decimal::ZERO,
    }
}

/// `round(round(days / cycle_days, 4) / periods_per_year, 10)`
pub fn two_stage_portion(days: i32, cycle_days: i32, periods_per_year: u32) -> Decimal {
    let fraction = div_round(
        Decimal::from(days),
        Decimal::from(cycle_days),
        PORTION_STAGE_ONE,
    );
    div_round(fraction, Decimal::from(periods_per_year), PORTION_SCALE)
}

/// `a * b`, or [`ComputeError::Overflow`] past the range of `Decimal`.
///
/// Source amounts come straight from configuration, so every product and
/// running sum in a period estimate goes through these.
#[inline]
pub fn checked_mul(a: Decimal, b: Decimal) -> ComputeResult<Decimal> {
    a.checked_mul(b).ok_or(ComputeError::Overflow)
}

#[inline]
pub fn checked_add(a: Decimal, b: Decimal) -> ComputeResult<Decimal> {
    a.checked_add(b).ok_or(ComputeError::Overflow)
}

#[inline]
pub fn checked_sub(a: Decimal, b: Decimal) -> ComputeResult<Decimal> {
    a.checked_sub(b).ok_or(ComputeError::Overflow)
}

/// Sum of `amounts`, failing on the first overflow.
pub fn checked_sum<I>(amounts: I) -> ComputeResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, checked_add)
}
