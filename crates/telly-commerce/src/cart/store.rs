//! The cart store: line items in a persisted slot.

use crate::cart::event::Observers;
use crate::cart::{
    CartChange, CartEvent, LineItem, LineItemInput, LineKey, SubscriptionId, DEFAULT_SIZE,
};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use telly_storage::{Cache, KeyValueStore};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Slot key the browser storefront has always used.
pub const DEFAULT_SLOT_KEY: &str = "cart";

/// Cart settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key of the persisted slot.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
    /// Size applied when an addition names none.
    #[serde(default = "default_size")]
    pub default_size: String,
    /// Currency every line item must be priced in.
    #[serde(default)]
    pub currency: Currency,
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
            default_size: default_size(),
            currency: Currency::default(),
        }
    }
}

/// Single source of truth for cart contents within one storage scope.
///
/// Every mutation runs read-modify-persist-notify synchronously: the whole
/// item sequence is written back to the slot, then subscribers see a
/// [`CartEvent`]. Two stores opened over the same slot are not coordinated;
/// whichever persists last wins, and [`reload`](Self::reload) is the only
/// way to pick up the other writer's state.
pub struct CartStore<S> {
    cache: Cache<S>,
    config: CartConfig,
    items: Vec<LineItem>,
    observers: Observers,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart, loading whatever the slot holds.
    ///
    /// A missing or unreadable slot yields an empty cart.
    pub fn open(cache: Cache<S>, config: CartConfig) -> Self {
        let items = load_items(&cache, &config);
        tracing::debug!(
            slot = %config.slot_key,
            lines = items.len(),
            "cart opened"
        );
        Self {
            cache,
            config,
            items,
            observers: Observers::default(),
        }
    }

    /// Add an item, merging into an existing line with the same product and size.
    ///
    /// Returns the key of the line that now holds the item.
    pub fn add(&mut self, input: LineItemInput) -> Result<LineKey, CommerceError> {
        let item = input.into_line_item(&self.config.default_size, self.config.currency)?;
        let key = item.key();
        let name = item.name.clone();
        let added = item.quantity;

        let merged = if let Some(existing) = self.items.iter_mut().find(|i| i.matches(&key)) {
            let new_quantity = existing
                .quantity
                .checked_add(added)
                .ok_or(CommerceError::Overflow)?;
            check_quantity(new_quantity)?;
            existing.price.try_multiply(new_quantity).ok_or(CommerceError::Overflow)?;
            existing.quantity = new_quantity;
            true
        } else {
            check_quantity(added)?;
            item.price.try_multiply(added).ok_or(CommerceError::Overflow)?;
            self.items.push(item);
            false
        };

        tracing::debug!(%key, quantity = added, merged, "added to cart");
        self.commit(CartChange::Added {
            key: key.clone(),
            name,
            quantity: added,
            merged,
        })?;
        Ok(key)
    }

    /// Remove the line with this key. Returns `false` if there was none.
    pub fn remove(&mut self, key: &LineKey) -> Result<bool, CommerceError> {
        let len_before = self.items.len();
        self.items.retain(|i| !i.matches(key));
        if self.items.len() == len_before {
            tracing::debug!(%key, "remove: no such line");
            return Ok(false);
        }

        tracing::debug!(%key, "removed from cart");
        self.commit(CartChange::Removed {
            keys: vec![key.clone()],
        })?;
        Ok(true)
    }

    /// Remove every line of a product, whatever its size. Returns how many went.
    pub fn remove_product(&mut self, product_id: &ProductId) -> Result<usize, CommerceError> {
        let keys: Vec<LineKey> = self
            .items
            .iter()
            .filter(|i| &i.product_id == product_id)
            .map(LineItem::key)
            .collect();
        if keys.is_empty() {
            return Ok(0);
        }

        self.items.retain(|i| &i.product_id != product_id);
        let removed = keys.len();
        tracing::debug!(%product_id, removed, "removed product from cart");
        self.commit(CartChange::Removed { keys })?;
        Ok(removed)
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// Returns `false` if no line has this key.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return self.remove(key);
        }
        check_quantity(quantity)?;

        let Some(item) = self.items.iter_mut().find(|i| i.matches(key)) else {
            return Ok(false);
        };
        item.price.try_multiply(quantity).ok_or(CommerceError::Overflow)?;
        if item.quantity == quantity {
            return Ok(true);
        }
        item.quantity = quantity;

        tracing::debug!(%key, quantity, "quantity changed");
        self.commit(CartChange::QuantityChanged {
            key: key.clone(),
            quantity,
        })?;
        Ok(true)
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.items.clear();
        tracing::info!(slot = %self.config.slot_key, "cart cleared");
        self.commit(CartChange::Cleared)
    }

    /// Discard in-memory state and re-read the slot.
    pub fn reload(&mut self) -> Result<(), CommerceError> {
        self.items = load_items(&self.cache, &self.config);
        self.notify(CartChange::Reloaded);
        Ok(())
    }

    /// Sum of `price * quantity` over all lines, computed on every call.
    pub fn total(&self) -> Money {
        self.items.iter().fold(Money::zero(self.config.currency), |acc, item| {
            Money::new(
                acc.amount_cents.saturating_add(item.line_total().amount_cents),
                acc.currency,
            )
        })
    }

    /// Sum of quantities, as shown on the cart badge.
    pub fn count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, key: &LineKey) -> Option<&LineItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Register a callback run after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartEvent) + 'static,
    {
        self.observers.subscribe(Box::new(callback))
    }

    /// Drop a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn commit(&mut self, change: CartChange) -> Result<(), CommerceError> {
        self.cache.set(&self.config.slot_key, &self.items)?;
        self.notify(change);
        Ok(())
    }

    fn notify(&self, change: CartChange) {
        let event = CartEvent {
            change,
            count: self.count(),
            total: self.total(),
        };
        self.observers.notify(&event);
    }
}

fn check_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

/// Read the slot, degrading to an empty cart on absence or corruption.
///
/// Each line is decoded on its own, so one unreadable entry is skipped
/// without losing the rest. Lines priced in another currency are dropped,
/// and duplicate keys are folded into the first occurrence so the
/// no-duplicates invariant holds even for hand-edited slots.
fn load_items<S: KeyValueStore>(cache: &Cache<S>, config: &CartConfig) -> Vec<LineItem> {
    let entries = match cache.get::<Vec<serde_json::Value>>(&config.slot_key) {
        Ok(Some(entries)) => entries,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(
                slot = %config.slot_key,
                error = %e,
                "unreadable cart slot, starting empty"
            );
            return Vec::new();
        }
    };

    let stored = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<LineItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    slot = %config.slot_key,
                    index,
                    error = %e,
                    "skipping unreadable cart line"
                );
                None
            }
        });

    let mut items: Vec<LineItem> = Vec::new();
    for item in stored {
        if item.price.currency != config.currency {
            tracing::warn!(
                key = %item.key(),
                currency = %item.price.currency,
                "dropping line priced in foreign currency"
            );
            continue;
        }
        match items.iter_mut().find(|i| i.matches(&item.key())) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_QUANTITY_PER_ITEM);
            }
            None => items.push(item),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Measurements, CUSTOM_SIZE};
    use std::cell::RefCell;
    use std::rc::Rc;
    use telly_storage::{MemoryStore, StorageError};

    /// Reads through to a memory store; every write fails.
    #[derive(Clone, Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::StoreError("quota exceeded".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::StoreError("quota exceeded".to_string()))
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn open_empty() -> CartStore<MemoryStore> {
        CartStore::open(Cache::new(MemoryStore::new()), CartConfig::default())
    }

    fn bikini(size: &str, quantity: i64) -> LineItemInput {
        LineItemInput::new("bk-01", "Ocean Bikini", usd(4999))
            .with_size(size)
            .with_quantity(quantity)
    }

    #[test]
    fn test_open_empty() {
        let cart = open_empty();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), usd(0));
    }

    #[test]
    fn test_add_same_key_merges() {
        let mut cart = open_empty();
        cart.add(bikini("M", 1)).unwrap();
        cart.add(bikini("M", 2)).unwrap();
        cart.add(bikini("M", 4)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.count(), 7);
    }

    #[test]
    fn test_add_different_size_appends() {
        let mut cart = open_empty();
        cart.add(bikini("M", 1)).unwrap();
        cart.add(bikini("L", 1)).unwrap();

        let sizes: Vec<&str> = cart.items().iter().map(|i| i.size.as_str()).collect();
        assert_eq!(sizes, vec!["M", "L"]);
    }

    #[test]
    fn test_merge_keeps_first_color() {
        let mut cart = open_empty();
        cart.add(bikini("M", 1).with_color("Coral")).unwrap();
        cart.add(bikini("M", 1).with_color("Navy")).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].color.as_deref(), Some("Coral"));
    }

    #[test]
    fn test_add_uses_configured_default_size() {
        let config = CartConfig {
            default_size: "S".to_string(),
            ..CartConfig::default()
        };
        let mut cart = CartStore::open(Cache::new(MemoryStore::new()), config);
        let key = cart
            .add(LineItemInput::new("bk-01", "Ocean Bikini", usd(4999)))
            .unwrap();
        assert_eq!(key, LineKey::new("bk-01", "S"));
    }

    #[test]
    fn test_add_invalid_leaves_cart_untouched() {
        let mut cart = open_empty();
        let store = cart.cache.store().clone();

        assert!(cart.add(bikini("M", 0)).is_err());
        assert!(cart
            .add(LineItemInput::new("bk-01", "Ocean Bikini", usd(-100)))
            .is_err());

        assert!(cart.is_empty());
        assert!(!store.exists(DEFAULT_SLOT_KEY).unwrap());
    }

    #[test]
    fn test_add_quantity_limit() {
        let mut cart = open_empty();
        cart.add(bikini("M", MAX_QUANTITY_PER_ITEM)).unwrap();

        let err = cart.add(bikini("M", 1)).unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(10000, 9999)));
        assert_eq!(cart.count(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_add_custom_size() {
        let mut cart = open_empty();
        let key = cart
            .add(
                bikini(CUSTOM_SIZE, 1)
                    .with_measurements(Measurements::new(34.0, 28.0, 38.0)),
            )
            .unwrap();
        assert!(cart.get(&key).unwrap().is_custom());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = open_empty();
        cart.add(bikini("M", 1)).unwrap();

        assert!(!cart.remove(&LineKey::new("bk-01", "XL")).unwrap());
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_remove_product_removes_all_sizes() {
        let mut cart = open_empty();
        cart.add(bikini("M", 1)).unwrap();
        cart.add(bikini("L", 1)).unwrap();
        cart.add(LineItemInput::new("bk-02", "Sunset Halter", usd(5950)))
            .unwrap();

        assert_eq!(cart.remove_product(&ProductId::new("bk-01")).unwrap(), 2);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.remove_product(&ProductId::new("bk-01")).unwrap(), 0);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = open_empty();
        let key = cart.add(bikini("M", 1)).unwrap();

        assert!(cart.set_quantity(&key, 5).unwrap());
        assert_eq!(cart.count(), 5);
        assert!(!cart.set_quantity(&LineKey::new("nope", "M"), 5).unwrap());
        assert!(cart.set_quantity(&key, MAX_QUANTITY_PER_ITEM + 1).is_err());
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = open_empty();
        let key = cart.add(bikini("M", 3)).unwrap();

        assert!(cart.set_quantity(&key, 0).unwrap());
        assert!(cart.get(&key).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total() {
        let mut cart = open_empty();
        cart.add(LineItemInput::new("tp-01", "Reef Top", usd(1999)).with_quantity(2))
            .unwrap();
        assert_eq!(cart.total(), usd(3998));

        cart.add(LineItemInput::new("bt-01", "Reef Bottom", usd(2500)))
            .unwrap();
        assert_eq!(cart.total(), usd(6498));
    }

    #[test]
    fn test_every_mutation_persists() {
        let store = MemoryStore::new();
        let mut cart = CartStore::open(Cache::new(store.clone()), CartConfig::default());
        let key = cart.add(bikini("M", 2)).unwrap();
        cart.set_quantity(&key, 4).unwrap();

        let reopened = CartStore::open(Cache::new(store.clone()), CartConfig::default());
        assert_eq!(reopened.items(), cart.items());

        cart.clear().unwrap();
        assert_eq!(store.get(DEFAULT_SLOT_KEY).unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_corrupt_slot_opens_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_SLOT_KEY, b"{\"items\": oops").unwrap();

        let cart = CartStore::open(Cache::new(store), CartConfig::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_folds_duplicates_and_drops_foreign_currency() {
        let store = MemoryStore::new();
        store
            .set(
                DEFAULT_SLOT_KEY,
                br#"[
                    {"productId":"bk-01","name":"Ocean Bikini","price":49.99,"size":"M","quantity":1},
                    {"productId":"bk-01","name":"Ocean Bikini","price":49.99,"size":"M","quantity":2},
                    {"productId":"bk-02","name":"Sunset Halter","price":59.5,"currency":"EUR","size":"M","quantity":1}
                ]"#,
            )
            .unwrap();

        let cart = CartStore::open(Cache::new(store), CartConfig::default());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_failed_write_propagates_without_notifying() {
        let store = ReadOnlyStore::default();
        let mut cart = CartStore::open(Cache::new(store.clone()), CartConfig::default());
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        cart.subscribe(move |_| *sink.borrow_mut() += 1);

        let err = cart.add(bikini("M", 1)).unwrap_err();
        assert!(matches!(err, CommerceError::Storage(StorageError::StoreError(_))));
        assert_eq!(*hits.borrow(), 0);

        // The process-local cart is ahead of the slot until a write succeeds.
        assert_eq!(cart.count(), 1);
        assert!(!store.exists(DEFAULT_SLOT_KEY).unwrap());
        assert!(CartStore::open(Cache::new(store), CartConfig::default()).is_empty());
    }

    #[test]
    fn test_custom_line_survives_reopen() {
        let store = MemoryStore::new();
        let mut cart = CartStore::open(Cache::new(store.clone()), CartConfig::default());
        let measurements = Measurements::new(34.0, 28.0, 38.0).with_under_bust(30.0);
        let key = cart
            .add(bikini(CUSTOM_SIZE, 1).with_measurements(measurements))
            .unwrap();

        let reopened = CartStore::open(Cache::new(store), CartConfig::default());
        let item = reopened.get(&key).unwrap();
        assert!(item.is_custom());
        assert_eq!(item.measurements, Some(measurements));
        assert_eq!(reopened.items(), cart.items());
    }

    #[test]
    fn test_load_skips_unreadable_lines() {
        let store = MemoryStore::new();
        store
            .set(
                DEFAULT_SLOT_KEY,
                br#"[
                    {"productId":"bk-01","name":"Ocean Bikini","price":null,"size":"M","quantity":1},
                    "not a line",
                    {"productId":"bk-02","name":"Sunset Halter","price":59.5,"size":"S","quantity":2}
                ]"#,
            )
            .unwrap();

        let cart = CartStore::open(Cache::new(store), CartConfig::default());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].key(), LineKey::new("bk-02", "S"));
    }

    #[test]
    fn test_observers_see_post_change_aggregates() {
        let mut cart = open_empty();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        cart.subscribe(move |e: &CartEvent| sink.borrow_mut().push(e.clone()));

        let key = cart.add(bikini("M", 2)).unwrap();
        cart.remove(&LineKey::new("missing", "M")).unwrap();
        cart.set_quantity(&key, 0).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].count, 2);
        assert_eq!(events[0].total, usd(9998));
        assert_eq!(
            events[0].notification().as_deref(),
            Some("Ocean Bikini added to cart!")
        );
        assert_eq!(
            events[1].change,
            CartChange::Removed { keys: vec![key] }
        );
        assert_eq!(events[1].count, 0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut cart = open_empty();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let id = cart.subscribe(move |_| *sink.borrow_mut() += 1);

        cart.add(bikini("M", 1)).unwrap();
        assert!(cart.unsubscribe(id));
        cart.clear().unwrap();

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(cart.subscriber_count(), 0);
    }

    #[test]
    fn test_two_tabs_last_writer_wins() {
        let store = MemoryStore::new();
        let mut tab_a = CartStore::open(Cache::new(store.clone()), CartConfig::default());
        let mut tab_b = CartStore::open(Cache::new(store.clone()), CartConfig::default());

        tab_a.add(bikini("M", 1)).unwrap();
        tab_b.add(bikini("L", 1)).unwrap();

        tab_a.reload().unwrap();
        assert_eq!(tab_a.items().len(), 1);
        assert_eq!(tab_a.items()[0].size, "L");
    }
}
