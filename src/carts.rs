//! Carts
//!
//! A cart is the mutable pre-order collection of desired items. Totals are
//! derived state: [`Cart::update`] recomputes the subtotal, the extra price
//! fields contributed by the active modifiers, and the grand total. Any item
//! change invalidates previously computed totals.

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    modifiers::{ExtraPriceField, ModifierRegistry},
    pricing::{PricingError, line_total},
    products::{Product, ProductKey},
};

new_key_type! {
    /// Cart Key
    pub struct CartKey;
}

/// Errors related to cart mutation or total computation.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// The product is not active and cannot be added.
    #[error("Product {0} is not active")]
    InactiveProduct(String),

    /// Wrapped pricing or money arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One cart line: a product reference, the unit price captured when the
/// product was added, and a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Referenced product
    pub product: ProductKey,

    /// Unit price captured when the product entered the cart
    pub unit_price: Money<'static, Currency>,

    /// Quantity, always at least one
    pub quantity: u32,
}

/// Totals materialized by [`Cart::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    /// Sum of unit price × quantity over all items
    pub subtotal_price: Money<'static, Currency>,

    /// Subtotal plus all extra price field amounts
    pub total_price: Money<'static, Currency>,

    /// One field per active modifier, in registration order
    pub extra_price_fields: SmallVec<[ExtraPriceField; 2]>,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: &'static Currency,
    totals: Option<CartTotals>,
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            totals: None,
        }
    }

    /// Add a quantity of a product to the cart.
    ///
    /// Adding a product already in the cart increases that line's quantity
    /// rather than creating a second line. Invalidates computed totals.
    ///
    /// # Errors
    ///
    /// - [`CartError::InactiveProduct`]: the product is not active.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in a
    ///   different currency than the cart.
    /// - [`CartError::Pricing`]: the merged quantity overflowed.
    pub fn add_product(
        &mut self,
        key: ProductKey,
        product: &Product,
        quantity: u32,
    ) -> Result<(), CartError> {
        if !product.active {
            return Err(CartError::InactiveProduct(product.slug.clone()));
        }

        let item_currency = product.unit_price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                self.items.len(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if quantity == 0 {
            return Ok(());
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.product == key) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or(PricingError::AmountOverflow)?;
        } else {
            self.items.push(CartItem {
                product: key,
                unit_price: product.unit_price,
                quantity,
            });
        }

        self.totals = None;

        Ok(())
    }

    /// Set the quantity of an existing line; a quantity of zero removes the
    /// line. Lines for other products are untouched. Invalidates computed
    /// totals if anything changed.
    pub fn set_quantity(&mut self, key: ProductKey, quantity: u32) {
        if quantity == 0 {
            let before = self.items.len();
            self.items.retain(|item| item.product != key);

            if self.items.len() != before {
                self.totals = None;
            }
        } else if let Some(item) = self.items.iter_mut().find(|item| item.product == key) {
            if item.quantity != quantity {
                item.quantity = quantity;
                self.totals = None;
            }
        }
    }

    /// Recompute the subtotal, extra price fields and total.
    ///
    /// The subtotal is the sum over items of unit price × quantity. Each
    /// active modifier is applied once, in registration order, against that
    /// subtotal; the total is the subtotal plus every field amount. Calling
    /// this twice with no intervening item changes yields identical results.
    /// An empty cart yields zero subtotal and total and no extra fields.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Pricing`] if money arithmetic or a modifier
    /// calculation fails.
    pub fn update(&mut self, modifiers: &ModifierRegistry) -> Result<(), CartError> {
        let subtotal_price = self
            .items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                let line = line_total(&item.unit_price, item.quantity)?;

                acc.add(line).map_err(PricingError::from)
            })?;

        let mut extra_price_fields: SmallVec<[ExtraPriceField; 2]> = SmallVec::new();

        if !self.items.is_empty() {
            for modifier in modifiers.enabled_modifiers() {
                extra_price_fields.push(modifier.apply(&subtotal_price)?);
            }
        }

        let total_price = extra_price_fields
            .iter()
            .try_fold(subtotal_price, |acc: Money<'static, Currency>, field| {
                acc.add(field.amount)
            })
            .map_err(PricingError::from)?;

        self.totals = Some(CartTotals {
            subtotal_price,
            total_price,
            extra_price_fields,
        });

        Ok(())
    }

    /// The cart's items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Totals from the most recent [`Cart::update`], if any and still valid.
    pub fn totals(&self) -> Option<&CartTotals> {
        self.totals.as_ref()
    }

    /// Subtotal from the most recent [`Cart::update`], if valid.
    pub fn subtotal_price(&self) -> Option<Money<'static, Currency>> {
        self.totals.as_ref().map(|t| t.subtotal_price)
    }

    /// Total from the most recent [`Cart::update`], if valid.
    pub fn total_price(&self) -> Option<Money<'static, Currency>> {
        self.totals.as_ref().map(|t| t.total_price)
    }

    /// Extra price fields from the most recent [`Cart::update`]; empty if
    /// the cart has not been updated.
    pub fn extra_price_fields(&self) -> &[ExtraPriceField] {
        self.totals
            .as_ref()
            .map_or(&[], |t| t.extra_price_fields.as_slice())
    }
}
