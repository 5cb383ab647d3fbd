//! Checkout
//!
//! Checkout is the cart-to-order core of a shop system: a product catalog, a
//! mutable cart with pluggable price modifiers (tax, discounts), and an
//! immutable order snapshot created from a cart, backed by a
//! dependency-injected storage layer.

pub mod carts;
pub mod config;
pub mod modifiers;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod service;
pub mod storage;
