//! Price modifiers
//!
//! Pluggable rules that adjust a cart's total. The set of modifiers is
//! closed: configured identifiers resolve through [`resolve`] to variants of
//! [`PriceModifier`], and a [`ModifierRegistry`] applies them in registration
//! order. Modifiers are proportional to the subtotal only, so a zero
//! subtotal always contributes zero.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{PricingError, percent_of_minor};

/// Identifier for the built-in 10% tax modifier.
pub const TEN_PERCENT_TAX: &str = "ten-percent-tax";

/// Identifier for the built-in 5% order discount modifier.
pub const FIVE_PERCENT_DISCOUNT: &str = "five-percent-discount";

/// Identifiers accepted by [`resolve`].
pub const KNOWN_MODIFIERS: &[&str] = &[TEN_PERCENT_TAX, FIVE_PERCENT_DISCOUNT];

/// Errors raised while resolving modifier identifiers.
#[derive(Debug, Error, PartialEq)]
pub enum ModifierError {
    /// A configured identifier does not name a known modifier.
    #[error("unknown price modifier identifier: {0}")]
    UnknownModifier(String),
}

/// A named, computed adjustment amount attached to a cart or order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraPriceField {
    /// Human-readable label for the adjustment ("10% Tax")
    pub label: String,

    /// Adjustment amount; negative for discounts
    pub amount: Money<'static, Currency>,
}

/// Price modifier enum
#[derive(Debug, Clone)]
pub enum PriceModifier {
    /// Add a percentage of the cart subtotal as a tax line.
    PercentageTax {
        /// Label for the resulting extra price field
        label: String,

        /// Tax rate as a fraction of the subtotal
        rate: Percentage,
    },

    /// Subtract a percentage of the cart subtotal as a discount line.
    PercentageDiscount {
        /// Label for the resulting extra price field
        label: String,

        /// Discount rate as a fraction of the subtotal
        rate: Percentage,
    },
}

impl PriceModifier {
    /// Return the label this modifier attaches to its extra price field.
    pub fn label(&self) -> &str {
        match self {
            PriceModifier::PercentageTax { label, .. }
            | PriceModifier::PercentageDiscount { label, .. } => label,
        }
    }

    /// Compute this modifier's contribution for the given cart subtotal.
    ///
    /// The returned amount is in the subtotal's currency and is negative for
    /// discounts. Repeated calls with the same subtotal yield the same field.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the percentage calculation cannot be
    /// represented in minor units.
    pub fn apply(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<ExtraPriceField, PricingError> {
        let (label, minor) = match self {
            PriceModifier::PercentageTax { label, rate } => {
                (label, percent_of_minor(rate, subtotal.to_minor_units())?)
            }
            PriceModifier::PercentageDiscount { label, rate } => {
                let minor = percent_of_minor(rate, subtotal.to_minor_units())?;
                (label, minor.checked_neg().ok_or(PricingError::AmountOverflow)?)
            }
        };

        Ok(ExtraPriceField {
            label: label.clone(),
            amount: Money::from_minor(minor, subtotal.currency()),
        })
    }
}

/// Resolve a configured identifier to its modifier implementation.
///
/// # Errors
///
/// Returns [`ModifierError::UnknownModifier`] for identifiers outside
/// [`KNOWN_MODIFIERS`].
pub fn resolve(identifier: &str) -> Result<PriceModifier, ModifierError> {
    match identifier {
        TEN_PERCENT_TAX => Ok(PriceModifier::PercentageTax {
            label: "10% Tax".to_string(),
            rate: Percentage::from(0.1),
        }),
        FIVE_PERCENT_DISCOUNT => Ok(PriceModifier::PercentageDiscount {
            label: "5% Discount".to_string(),
            rate: Percentage::from(0.05),
        }),
        other => Err(ModifierError::UnknownModifier(other.to_string())),
    }
}

/// Ordered collection of active price modifiers.
///
/// Modifiers are applied in registration order, which for a registry built
/// from configuration is the configured order.
#[derive(Debug, Clone, Default)]
pub struct ModifierRegistry {
    modifiers: Vec<PriceModifier>,
}

impl ModifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by resolving the given identifiers in order.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError::UnknownModifier`] for the first identifier
    /// that does not resolve.
    pub fn from_identifiers<I, S>(identifiers: I) -> Result<Self, ModifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let modifiers = identifiers
            .into_iter()
            .map(|id| resolve(id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { modifiers })
    }

    /// Append a modifier to the end of the registration order.
    pub fn register(&mut self, modifier: PriceModifier) {
        self.modifiers.push(modifier);
    }

    /// The active modifiers, in registration order.
    pub fn enabled_modifiers(&self) -> &[PriceModifier] {
        &self.modifiers
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ten_percent_tax_applies_to_subtotal() -> TestResult {
        let modifier = resolve(TEN_PERCENT_TAX)?;
        let field = modifier.apply(&Money::from_minor(10_000, iso::USD))?;

        assert_eq!(field.label, "10% Tax");
        assert_eq!(field.amount, Money::from_minor(1_000, iso::USD));

        Ok(())
    }

    #[test]
    fn discount_contribution_is_negative() -> TestResult {
        let modifier = resolve(FIVE_PERCENT_DISCOUNT)?;
        let field = modifier.apply(&Money::from_minor(10_000, iso::USD))?;

        assert_eq!(field.amount, Money::from_minor(-500, iso::USD));

        Ok(())
    }

    #[test]
    fn zero_subtotal_contributes_zero() -> TestResult {
        let modifier = resolve(TEN_PERCENT_TAX)?;
        let field = modifier.apply(&Money::from_minor(0, iso::USD))?;

        assert_eq!(field.amount, Money::from_minor(0, iso::USD));

        Ok(())
    }

    #[test]
    fn apply_is_deterministic() -> TestResult {
        let modifier = resolve(TEN_PERCENT_TAX)?;
        let subtotal = Money::from_minor(12_345, iso::USD);

        assert_eq!(modifier.apply(&subtotal)?, modifier.apply(&subtotal)?);

        Ok(())
    }

    #[test]
    fn resolve_unknown_identifier_errors() {
        let result = resolve("shop.cart.modifiers.bogus");

        assert!(matches!(result, Err(ModifierError::UnknownModifier(_))));
    }

    #[test]
    fn from_identifiers_preserves_configured_order() -> TestResult {
        let registry =
            ModifierRegistry::from_identifiers([FIVE_PERCENT_DISCOUNT, TEN_PERCENT_TAX])?;

        let labels: Vec<&str> = registry
            .enabled_modifiers()
            .iter()
            .map(PriceModifier::label)
            .collect();

        assert_eq!(labels, ["5% Discount", "10% Tax"]);

        Ok(())
    }

    #[test]
    fn from_identifiers_rejects_unknown() {
        let result = ModifierRegistry::from_identifiers([TEN_PERCENT_TAX, "no-such-modifier"]);

        assert_eq!(
            result.map(|_| ()),
            Err(ModifierError::UnknownModifier("no-such-modifier".to_string()))
        );
    }

    #[test]
    fn register_appends_in_order() -> TestResult {
        let mut registry = ModifierRegistry::new();
        registry.register(resolve(TEN_PERCENT_TAX)?);
        registry.register(resolve(FIVE_PERCENT_DISCOUNT)?);

        assert_eq!(registry.enabled_modifiers().len(), 2);
        assert_eq!(
            registry.enabled_modifiers().first().map(PriceModifier::label),
            Some("10% Tax")
        );

        Ok(())
    }
}
