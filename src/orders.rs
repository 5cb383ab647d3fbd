//! Orders
//!
//! An order is the immutable record created from a cart at checkout time.
//! [`Order::create_from_cart`] snapshots the cart's lines, extra price
//! fields and totals; nothing on the order is ever recomputed afterwards.

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::{carts::Cart, modifiers::ExtraPriceField, products::ProductKey};

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// Validation errors for order creation.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// The cart has no items.
    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    /// The cart's totals were never computed, or were invalidated by an
    /// item change after the last update.
    #[error("cart totals have not been computed; update the cart before checkout")]
    StaleCart,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Created from a cart, awaiting confirmation
    Processing,

    /// Confirmed by the shop
    Confirmed,

    /// Fulfilled
    Completed,
}

/// Snapshot of one cart line at order-creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// Referenced product
    pub product: ProductKey,

    /// Unit price at the time the order was created
    pub unit_price: Money<'static, Currency>,

    /// Ordered quantity
    pub quantity: u32,
}

/// Snapshot of one cart extra price field at order-creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraOrderPriceField {
    /// Label copied from the cart field
    pub label: String,

    /// Amount copied from the cart field
    pub amount: Money<'static, Currency>,
}

impl From<&ExtraPriceField> for ExtraOrderPriceField {
    fn from(field: &ExtraPriceField) -> Self {
        Self {
            label: field.label.clone(),
            amount: field.amount,
        }
    }
}

/// Order
#[derive(Debug, Clone)]
pub struct Order {
    status: OrderStatus,
    items: Vec<OrderItem>,
    extra_price_fields: Vec<ExtraOrderPriceField>,
    order_subtotal: Money<'static, Currency>,
    order_total: Money<'static, Currency>,
    currency: &'static Currency,
}

impl Order {
    /// Create an order by snapshotting an updated cart.
    ///
    /// Each cart line becomes one [`OrderItem`] (iteration order preserved),
    /// each cart extra price field one [`ExtraOrderPriceField`], and the
    /// cart's subtotal and total are copied verbatim. The cart itself is
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: the cart has no items.
    /// - [`OrderError::StaleCart`]: the cart has no valid totals; the caller
    ///   must run [`Cart::update`] first.
    pub fn create_from_cart(cart: &Cart) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let totals = cart.totals().ok_or(OrderError::StaleCart)?;

        let items = cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product: item.product,
                unit_price: item.unit_price,
                quantity: item.quantity,
            })
            .collect();

        let extra_price_fields = totals
            .extra_price_fields
            .iter()
            .map(ExtraOrderPriceField::from)
            .collect();

        Ok(Self {
            status: OrderStatus::Processing,
            items,
            extra_price_fields,
            order_subtotal: totals.subtotal_price,
            order_total: totals.total_price,
            currency: cart.currency(),
        })
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Mark the order as confirmed.
    pub fn confirm(&mut self) {
        if self.status == OrderStatus::Processing {
            self.status = OrderStatus::Confirmed;
        }
    }

    /// Mark the order as completed.
    pub fn complete(&mut self) {
        if self.status == OrderStatus::Confirmed {
            self.status = OrderStatus::Completed;
        }
    }

    /// The order's items, in the source cart's order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// The extra price fields copied from the source cart.
    pub fn extra_price_fields(&self) -> &[ExtraOrderPriceField] {
        &self.extra_price_fields
    }

    /// Subtotal copied from the source cart at creation time.
    pub fn order_subtotal(&self) -> Money<'static, Currency> {
        self.order_subtotal
    }

    /// Total copied from the source cart at creation time.
    pub fn order_total(&self) -> Money<'static, Currency> {
        self.order_total
    }

    /// The currency of the order.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
