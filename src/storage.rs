//! Storage
//!
//! Dependency-injected persistence for the shop entities, replacing any
//! reliance on process-wide state. Entity stores are small traits so callers
//! can swap the backing implementation; [`InMemoryStore`] implements all of
//! them over slot maps.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::{
    carts::{Cart, CartKey},
    orders::{Order, OrderKey},
    products::{Product, ProductKey},
};

/// Create/read access to the product catalog.
pub trait ProductStore {
    /// Persist a product, returning its key.
    fn create_product(&mut self, product: Product) -> ProductKey;

    /// Look a product up by key.
    fn product(&self, key: ProductKey) -> Option<&Product>;

    /// Look a product up by slug.
    fn product_by_slug(&self, slug: &str) -> Option<(ProductKey, &Product)>;
}

/// Create/read access to carts.
pub trait CartStore {
    /// Persist a cart, returning its key.
    fn create_cart(&mut self, cart: Cart) -> CartKey;

    /// Look a cart up by key.
    fn cart(&self, key: CartKey) -> Option<&Cart>;

    /// Look a cart up by key for mutation.
    fn cart_mut(&mut self, key: CartKey) -> Option<&mut Cart>;
}

/// Create/read access to orders.
pub trait OrderStore {
    /// Persist a fully-built order, returning its key.
    ///
    /// The order enters the store as a single value together with its owned
    /// items and extra price fields, so a partially-created order is never
    /// observable.
    fn create_order(&mut self, order: Order) -> OrderKey;

    /// Look an order up by key.
    fn order(&self, key: OrderKey) -> Option<&Order>;

    /// Look an order up by key for status transitions.
    fn order_mut(&mut self, key: OrderKey) -> Option<&mut Order>;
}

/// In-memory store backing all entity traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: SlotMap<ProductKey, Product>,
    products_by_slug: FxHashMap<String, ProductKey>,
    carts: SlotMap<CartKey, Cart>,
    orders: SlotMap<OrderKey, Order>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of persisted orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl ProductStore for InMemoryStore {
    fn create_product(&mut self, product: Product) -> ProductKey {
        let slug = product.slug.clone();
        let key = self.products.insert(product);
        self.products_by_slug.insert(slug, key);

        key
    }

    fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    fn product_by_slug(&self, slug: &str) -> Option<(ProductKey, &Product)> {
        let key = *self.products_by_slug.get(slug)?;

        Some((key, self.products.get(key)?))
    }
}

impl CartStore for InMemoryStore {
    fn create_cart(&mut self, cart: Cart) -> CartKey {
        self.carts.insert(cart)
    }

    fn cart(&self, key: CartKey) -> Option<&Cart> {
        self.carts.get(key)
    }

    fn cart_mut(&mut self, key: CartKey) -> Option<&mut Cart> {
        self.carts.get_mut(key)
    }
}

impl OrderStore for InMemoryStore {
    fn create_order(&mut self, order: Order) -> OrderKey {
        self.orders.insert(order)
    }

    fn order(&self, key: OrderKey) -> Option<&Order> {
        self.orders.get(key)
    }

    fn order_mut(&mut self, key: OrderKey) -> Option<&mut Order> {
        self.orders.get_mut(key)
    }
}
