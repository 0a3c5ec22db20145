//! The cart store.
//!
//! A [`CartStore`] owns the authoritative cart and mirrors it to a key in a
//! [`Cache`] after every change. Persistence is best-effort: failures are
//! logged and the in-memory cart stays authoritative.

use storefront_cache::{Cache, KvStore};
use tracing::{debug, info, warn};

use crate::cart::events::{Listener, Listeners};
use crate::cart::{
    CartEvent, CartLine, CartProduct, CartState, CartSummary, SubscriptionId,
    DEFAULT_TAX_RATE_BPS,
};
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "cart";

/// A shopper's cart, persisted to a key-value store.
#[derive(Debug)]
pub struct CartStore<S: KvStore> {
    cache: Cache<S>,
    key: String,
    state: CartState,
    tax_rate_bps: u32,
    listeners: Listeners,
}

impl<S: KvStore> CartStore<S> {
    /// Create an empty store. Call [`hydrate`](Self::hydrate) to load the
    /// persisted cart.
    pub fn new(cache: Cache<S>) -> Self {
        Self {
            cache,
            key: DEFAULT_CART_KEY.to_string(),
            state: CartState::default(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            listeners: Listeners::default(),
        }
    }

    /// Create a store and load the persisted cart.
    pub fn open(cache: Cache<S>) -> Self {
        let mut store = Self::new(cache);
        store.hydrate();
        store
    }

    /// Use `key` for persistence.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use `currency` for totals.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.state.currency = currency;
        self
    }

    /// Use `bps` basis points as the tax rate in [`summary`](Self::summary).
    pub fn with_tax_rate(mut self, bps: u32) -> Self {
        self.tax_rate_bps = bps;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// A missing entry loads as an empty cart. An unreadable or malformed
    /// entry is logged and also loads as an empty cart. Returns the number
    /// of lines loaded.
    pub fn hydrate(&mut self) -> usize {
        let lines = match self.cache.get::<Vec<CartLine>>(&self.key) {
            Ok(Some(lines)) => lines,
            Ok(None) => {
                debug!(key = %self.key, "no persisted cart");
                Vec::new()
            }
            Err(e) if e.is_malformed() => {
                warn!(key = %self.key, error = %e, "discarding malformed persisted cart");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted cart");
                Vec::new()
            }
        };

        self.state = CartState::from_lines(lines, self.state.currency);
        let lines = self.state.lines.len();
        debug!(key = %self.key, lines, "hydrated cart");
        self.listeners.emit(&CartEvent::Loaded { lines });
        lines
    }

    /// Add `quantity` units of a product. A product already in the cart has
    /// its quantity increased; otherwise a new line is appended.
    pub fn add_item(&mut self, product: impl Into<CartProduct>, quantity: u32) {
        let product = product.into();
        let id = product.id.clone();
        let name = product.name.clone();

        let quantity_now = match self.state.line_mut(&id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                line.quantity
            }
            None => {
                self.state.lines.push(CartLine::new(product, quantity));
                quantity
            }
        };

        self.persist();
        info!(id = %id, name = %name, added = quantity, quantity = quantity_now, "added to cart");
        self.listeners.emit(&CartEvent::Added { id, name, quantity });
    }

    /// Remove the line for `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        let before = self.state.lines.len();
        self.state.lines.retain(|l| &l.id != id);
        if self.state.lines.len() == before {
            debug!(id = %id, "remove of product not in cart");
            return;
        }

        self.persist();
        self.listeners.emit(&CartEvent::Removed { id: id.clone() });
    }

    /// Set the quantity of the line for `id`. Unknown ids are ignored.
    /// Quantities are stored as given; callers clamp to stock.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        match self.state.line_mut(id) {
            Some(line) => line.quantity = quantity,
            None => {
                debug!(id = %id, "quantity update for product not in cart");
                return;
            }
        }

        self.persist();
        self.listeners.emit(&CartEvent::QuantityUpdated {
            id: id.clone(),
            quantity,
        });
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.state.lines.clear();
        self.persist();
        self.listeners.emit(&CartEvent::Cleared);
    }

    pub fn is_in_cart(&self, id: &ProductId) -> bool {
        self.state.is_in_cart(id)
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Sum of quantity times effective price across lines.
    pub fn total_price(&self) -> Money {
        self.state.total_price()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.state.lines
    }

    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.state.line(id)
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Owned copy of the cart for rendering.
    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    /// Subtotal, shipping, tax and total at the configured tax rate.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_state(&self.state, self.tax_rate_bps)
    }

    /// Register a listener for cart changes. Listeners run after the change
    /// has been persisted.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        let listener: Listener = Box::new(listener);
        self.listeners.add(listener)
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn persist(&self) {
        match self.cache.set(&self.key, &self.state.lines) {
            Ok(()) => debug!(key = %self.key, lines = self.state.lines.len(), "persisted cart"),
            Err(e) => warn!(key = %self.key, error = %e, "failed to persist cart"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use storefront_cache::{CacheError, MemoryStore};

    /// Store whose every operation fails.
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Err(CacheError::StoreError("unavailable".into()))
        }
    }

    fn vase() -> CartProduct {
        CartProduct::new("p1", "Minimalist Ceramic Vase", Money::usd(4999)).with_stock(15)
    }

    #[test]
    fn test_store_survives_broken_storage() {
        let mut store = CartStore::open(Cache::new(BrokenStore));
        assert!(store.is_empty());

        store.add_item(vase(), 2);
        store.update_quantity(&ProductId::new("p1"), 5);
        assert_eq!(store.item_count(), 5);
        assert_eq!(store.total_price(), Money::usd(24995));

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_events_follow_mutations() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = CartStore::new(Cache::new(MemoryStore::new()));
        let sink = Arc::clone(&events);
        let subscription = store.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        store.add_item(vase(), 1);
        store.update_quantity(&ProductId::new("p1"), 3);
        store.update_quantity(&ProductId::new("missing"), 3);
        store.remove_item(&ProductId::new("missing"));
        store.remove_item(&ProductId::new("p1"));
        store.clear();

        assert!(store.unsubscribe(subscription));
        store.add_item(vase(), 1);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                CartEvent::Added {
                    id: ProductId::new("p1"),
                    name: "Minimalist Ceramic Vase".into(),
                    quantity: 1,
                },
                CartEvent::QuantityUpdated {
                    id: ProductId::new("p1"),
                    quantity: 3,
                },
                CartEvent::Removed {
                    id: ProductId::new("p1"),
                },
                CartEvent::Cleared,
            ]
        );
    }

    #[test]
    fn test_listener_sees_persisted_state() {
        let store_handle = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(Cache::new(Arc::clone(&store_handle)));
        let reader = Cache::new(Arc::clone(&store_handle));
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        store.subscribe(move |_| {
            let lines: Option<Vec<CartLine>> = reader.get(DEFAULT_CART_KEY).unwrap();
            *sink.lock().unwrap() = lines.map(|l| l.len());
        });

        store.add_item(vase(), 1);
        assert_eq!(*seen.lock().unwrap(), Some(1));
    }

    #[test]
    fn test_custom_key_and_tax_rate() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(Cache::new(Arc::clone(&backing)))
            .with_key("cart:guest")
            .with_tax_rate(0);
        store.add_item(vase(), 1);

        assert_eq!(store.key(), "cart:guest");
        assert!(backing.get("cart:guest").unwrap().is_some());
        assert!(backing.get(DEFAULT_CART_KEY).unwrap().is_none());
        assert_eq!(store.summary().total, Money::usd(4999));
    }

    #[test]
    fn test_update_quantity_is_not_clamped() {
        let mut store = CartStore::new(Cache::new(MemoryStore::new()));
        store.add_item(vase(), 1);
        store.update_quantity(&ProductId::new("p1"), 0);
        assert_eq!(store.line(&ProductId::new("p1")).map(|l| l.quantity), Some(0));
        store.update_quantity(&ProductId::new("p1"), 99);
        assert_eq!(store.item_count(), 99);
    }
}
