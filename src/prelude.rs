//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carts::{Cart, CartError, CartItem, CartKey, CartTotals},
    config::{ConfigError, ShopConfig},
    modifiers::{ExtraPriceField, ModifierError, ModifierRegistry, PriceModifier},
    orders::{ExtraOrderPriceField, Order, OrderError, OrderItem, OrderKey, OrderStatus},
    pricing::PricingError,
    products::{Product, ProductKey},
    service::{CheckoutError, CheckoutService},
    storage::{CartStore, InMemoryStore, OrderStore, ProductStore},
};
