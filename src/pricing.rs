//! Pricing
//!
//! Minor-unit arithmetic shared by cart totals and price modifiers.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur during price calculations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Percentage calculation could not be safely represented in minor units.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A unit price multiplied by a quantity overflowed the minor-unit range.
    #[error("line total overflowed the minor unit range")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount in minor units, rounding midpoints
/// away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the multiplication cannot
/// be represented as a `Decimal` or converted back to minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

/// Calculate the total for one line: unit price multiplied by quantity.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the multiplication overflows
/// the minor-unit range.
pub fn line_total(
    unit_price: &Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}
