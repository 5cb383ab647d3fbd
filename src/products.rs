//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
///
/// A catalog entry with a fixed unit price. Products are immutable once
/// created; carts and orders refer to them by [`ProductKey`].
#[derive(Debug, Clone)]
pub struct Product {
    /// Product name
    pub name: String,

    /// URL-safe identifier, unique within the catalog
    pub slug: String,

    /// Unit price
    pub unit_price: Money<'static, Currency>,

    /// Whether the product can currently be added to carts
    pub active: bool,
}

impl Product {
    /// Create an active product with the given name, slug and unit price.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        unit_price: Money<'static, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            unit_price,
            active: true,
        }
    }
}
