//! Checkout service
//!
//! Ties a store and a modifier registry together into the cart-to-order
//! flow: create a cart, add products, recompute totals, place the order.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    carts::{Cart, CartError, CartKey},
    config::{ConfigError, ShopConfig},
    modifiers::ModifierRegistry,
    orders::{Order, OrderError, OrderKey},
    products::ProductKey,
    storage::{CartStore, OrderStore, ProductStore},
};

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The product key does not exist in the store.
    #[error("product not found")]
    UnknownProduct,

    /// The cart key does not exist in the store.
    #[error("cart not found")]
    UnknownCart,

    /// Cart mutation or total computation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order validation failed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Checkout service over an injected store.
#[derive(Debug)]
pub struct CheckoutService<S> {
    store: S,
    modifiers: ModifierRegistry,
    currency: &'static Currency,
}

impl<S> CheckoutService<S>
where
    S: ProductStore + CartStore + OrderStore,
{
    /// Create a service with an explicit registry and currency.
    pub fn new(store: S, modifiers: ModifierRegistry, currency: &'static Currency) -> Self {
        Self {
            store,
            modifiers,
            currency,
        }
    }

    /// Create a service from a shop configuration, resolving the configured
    /// currency and modifier identifiers.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the currency code or a modifier
    /// identifier does not resolve.
    pub fn from_config(store: S, config: &ShopConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            store,
            modifiers: config.modifier_registry()?,
            currency: config.currency()?,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, for mutation outside the checkout flow.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Create and persist an empty cart in the shop currency.
    pub fn create_cart(&mut self) -> CartKey {
        let key = self.store.create_cart(Cart::new(self.currency));
        debug!(currency = self.currency.iso_alpha_code, "created cart");

        key
    }

    /// Add a quantity of a product to a cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownProduct`] or
    /// [`CheckoutError::UnknownCart`] for missing keys, otherwise any
    /// [`CartError`] from the cart itself.
    pub fn add_to_cart(
        &mut self,
        cart: CartKey,
        product: ProductKey,
        quantity: u32,
    ) -> Result<(), CheckoutError> {
        let product_data = self
            .store
            .product(product)
            .ok_or(CheckoutError::UnknownProduct)?
            .clone();

        let cart_data = self
            .store
            .cart_mut(cart)
            .ok_or(CheckoutError::UnknownCart)?;

        cart_data.add_product(product, &product_data, quantity)?;
        debug!(slug = %product_data.slug, quantity, "added product to cart");

        Ok(())
    }

    /// Recompute a cart's totals against the active modifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownCart`] for a missing key, otherwise
    /// any [`CartError`] from the computation.
    pub fn update_cart(&mut self, cart: CartKey) -> Result<(), CheckoutError> {
        let modifiers = &self.modifiers;

        let cart_data = self
            .store
            .cart_mut(cart)
            .ok_or(CheckoutError::UnknownCart)?;

        cart_data.update(modifiers)?;

        Ok(())
    }

    /// Create an order from a cart and persist it.
    ///
    /// The order is fully built before it enters the store, so creation is
    /// all-or-nothing. The cart must have been updated since its last item
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownCart`] for a missing key, or an
    /// [`OrderError`] if the cart is empty or its totals are stale.
    pub fn place_order(&mut self, cart: CartKey) -> Result<OrderKey, CheckoutError> {
        let cart_data = self.store.cart(cart).ok_or(CheckoutError::UnknownCart)?;

        let order = Order::create_from_cart(cart_data)?;

        info!(
            items = order.items().len(),
            total_minor = order.order_total().to_minor_units(),
            "created order from cart"
        );

        Ok(self.store.create_order(order))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{products::Product, storage::InMemoryStore};

    use super::*;

    fn service_with_product() -> TestResult<(CheckoutService<InMemoryStore>, ProductKey)> {
        let config = ShopConfig::from_yaml(
            "currency: USD\nprice_modifiers: [ten-percent-tax]",
        )?;

        let mut service = CheckoutService::from_config(InMemoryStore::new(), &config)?;

        let product = service.store_mut().create_product(Product::new(
            "Test Product",
            "test-product",
            Money::from_minor(10_000, iso::USD),
        ));

        Ok((service, product))
    }

    #[test]
    fn full_flow_places_a_taxed_order() -> TestResult {
        let (mut service, product) = service_with_product()?;

        let cart = service.create_cart();
        service.add_to_cart(cart, product, 1)?;
        service.update_cart(cart)?;

        let order_key = service.place_order(cart)?;
        let order = service.store().order(order_key).expect("order persisted");

        assert_eq!(order.order_subtotal(), Money::from_minor(10_000, iso::USD));
        assert_eq!(order.order_total(), Money::from_minor(11_000, iso::USD));
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.extra_price_fields().len(), 1);

        Ok(())
    }

    #[test]
    fn placing_an_order_from_an_unupdated_cart_fails() -> TestResult {
        let (mut service, product) = service_with_product()?;

        let cart = service.create_cart();
        service.add_to_cart(cart, product, 1)?;

        assert!(matches!(
            service.place_order(cart),
            Err(CheckoutError::Order(OrderError::StaleCart))
        ));

        Ok(())
    }

    #[test]
    fn placing_an_order_from_an_empty_cart_fails() -> TestResult {
        let (mut service, _product) = service_with_product()?;

        let cart = service.create_cart();
        service.update_cart(cart)?;

        assert!(matches!(
            service.place_order(cart),
            Err(CheckoutError::Order(OrderError::EmptyCart))
        ));

        Ok(())
    }

    #[test]
    fn failed_placement_persists_nothing() -> TestResult {
        let (mut service, _product) = service_with_product()?;

        let cart = service.create_cart();
        let _ = service.place_order(cart);

        assert_eq!(service.store().order_count(), 0);

        Ok(())
    }

    #[test]
    fn unknown_keys_are_reported() -> TestResult {
        let (mut service, product) = service_with_product()?;

        assert!(matches!(
            service.add_to_cart(CartKey::default(), product, 1),
            Err(CheckoutError::UnknownCart)
        ));

        let cart = service.create_cart();
        assert!(matches!(
            service.add_to_cart(cart, ProductKey::default(), 1),
            Err(CheckoutError::UnknownProduct)
        ));

        Ok(())
    }

    #[test]
    fn registry_from_config_drives_totals() -> TestResult {
        let config = ShopConfig::from_yaml("currency: USD")?;
        let mut service = CheckoutService::from_config(InMemoryStore::new(), &config)?;

        let product = service.store_mut().create_product(Product::new(
            "Untaxed",
            "untaxed",
            Money::from_minor(10_000, iso::USD),
        ));

        let cart = service.create_cart();
        service.add_to_cart(cart, product, 1)?;
        service.update_cart(cart)?;

        let order = service.place_order(cart)?;
        let order = service.store().order(order).expect("order persisted");

        assert_eq!(order.order_total(), order.order_subtotal());
        assert!(order.extra_price_fields().is_empty());

        Ok(())
    }
}
