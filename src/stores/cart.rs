//! Cart store: the reducer plus hydration and write-back.

use tracing::{debug, error, warn};

use crate::domain::aggregates::{CartAction, CartCandidate, CartLineItem, CartState};
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{format_price, ProductId, Vnd};
use crate::storage::{load_json, save_json, SharedStorage};

pub const CART_STORAGE_KEY: &str = "mombaby-cart";

#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    storage: SharedStorage,
    events: Vec<DomainEvent>,
}

impl CartStore {
    /// Creates the store and hydrates it from `storage`. Never fails: a bad
    /// saved cart is logged and the store starts empty.
    pub fn open(storage: SharedStorage) -> Self {
        let mut store = Self { state: CartState::new(), storage, events: vec![] };
        match load_json::<Vec<CartLineItem>>(store.storage.as_ref(), CART_STORAGE_KEY) {
            Ok(Some(items)) => {
                debug!(lines = items.len(), "restored saved cart");
                store.dispatch(CartAction::LoadCart(items));
            }
            Ok(None) => debug!("no saved cart"),
            Err(e) => warn!(key = CART_STORAGE_KEY, error = %e, "ignoring unreadable saved cart"),
        }
        store
    }

    pub fn items(&self) -> &[CartLineItem] { self.state.items() }
    pub fn total_items(&self) -> u64 { self.state.total_items() }
    pub fn total_price(&self) -> Vnd { self.state.total_price() }
    pub fn is_open(&self) -> bool { self.state.is_open() }
    pub fn is_empty(&self) -> bool { self.state.is_empty() }

    pub fn add_item(&mut self, candidate: CartCandidate, quantity: Option<u32>) {
        let added = quantity.filter(|q| *q > 0).unwrap_or(1);
        let event = CartEvent::ItemAdded { product_id: candidate.id, name: candidate.name.clone(), quantity: added };
        self.dispatch(CartAction::AddItem { candidate, quantity });
        self.raise(event);
    }

    pub fn remove_item(&mut self, id: ProductId) {
        let removed = self.removed_events(id);
        self.dispatch(CartAction::RemoveItem(id));
        removed.into_iter().for_each(|e| self.raise(e));
    }

    /// Sets the quantity of the first line with this id; zero or less removes
    /// every line with the id.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        let events = if quantity <= 0 {
            self.removed_events(id)
        } else if self.items().iter().any(|i| i.id == id) {
            vec![CartEvent::QuantityChanged { product_id: id, quantity: u32::try_from(quantity).unwrap_or(u32::MAX) }]
        } else {
            vec![]
        };
        self.dispatch(CartAction::UpdateQuantity { id, quantity });
        events.into_iter().for_each(|e| self.raise(e));
    }

    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::ClearCart);
        self.raise(CartEvent::Cleared);
    }

    pub fn toggle_cart(&mut self) { self.dispatch(CartAction::ToggleCart) }
    pub fn open_cart(&mut self) { self.dispatch(CartAction::OpenCart) }
    pub fn close_cart(&mut self) { self.dispatch(CartAction::CloseCart) }

    pub fn format_price(amount: Vnd) -> String { format_price(amount.amount()) }

    /// Drains the events raised since the last call. They accumulate until
    /// drained, so a long-lived store outside `Storefront` must call this.
    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }

    fn dispatch(&mut self, action: CartAction) {
        let persists = action.persists();
        self.state = std::mem::take(&mut self.state).reduce(action);
        if persists {
            self.persist();
        }
    }

    fn persist(&self) {
        match save_json(self.storage.as_ref(), CART_STORAGE_KEY, self.state.items()) {
            Ok(()) => debug!(lines = self.state.line_count(), "saved cart"),
            Err(e) => error!(key = CART_STORAGE_KEY, error = %e, "failed to save cart; keeping in-memory state"),
        }
    }

    fn removed_events(&self, id: ProductId) -> Vec<CartEvent> {
        self.items().iter()
            .filter(|i| i.id == id)
            .map(|i| CartEvent::ItemRemoved { product_id: id, name: i.name.clone() })
            .collect()
    }

    fn raise(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;
    use crate::domain::aggregates::cart::tests::candidate;
    use crate::storage::{LocalStorage, MemoryStorage};

    fn saved(storage: &MemoryStorage) -> Vec<CartLineItem> {
        serde_json::from_str(&storage.get(CART_STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_every_item_mutation_is_written_back() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::open(storage.clone());
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());

        cart.add_item(candidate(1, "7.500.000 đ", Some("M"), None), Some(2));
        assert_eq!(saved(&storage), cart.items());

        cart.update_quantity(1, 4);
        assert_eq!(saved(&storage)[0].quantity, 4);

        cart.remove_item(1);
        assert!(saved(&storage).is_empty());

        cart.add_item(candidate(2, "320.000 đ", None, None), None);
        cart.clear_cart();
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_visibility_changes_do_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::open(storage.clone());
        cart.toggle_cart();
        cart.open_cart();
        cart.close_cart();
        assert!(storage.is_empty());
        assert!(!cart.is_open());
    }

    #[test]
    fn test_restart_restores_items_and_totals() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::open(storage.clone());
        cart.add_item(candidate(1, "7.500.000 đ", Some("M"), Some("Đen")), Some(2));
        cart.add_item(candidate(2, "320.000 đ", None, None), Some(3));
        cart.open_cart();

        let restarted = CartStore::open(storage);
        assert_eq!(restarted.items(), cart.items());
        assert_eq!(restarted.total_items(), 5);
        assert_eq!(restarted.total_price(), cart.total_price());
        assert!(!restarted.is_open());
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        for raw in ["{not json", "null", r#"{"items":[]}"#, r#"[{"id":"one"}]"#] {
            let storage = Arc::new(MemoryStorage::new());
            storage.set(CART_STORAGE_KEY, raw).unwrap();
            let cart = CartStore::open(storage);
            assert!(cart.items().is_empty(), "{raw}");
            assert_eq!(cart.total_items(), 0);
            assert_eq!(cart.total_price(), Vnd::ZERO);
        }
    }

    #[test]
    fn test_hydration_normalizes_saved_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let line = r#"{"id":7,"name":"Áo thun","price":"150.000 đ","image":"/clothing-2.png","category":"Quần áo","quantity":QTY,"selectedSize":"6M"}"#;
        storage.set(CART_STORAGE_KEY, &format!("[{}]", line.replace("QTY", "0"))).unwrap();
        let cart = CartStore::open(storage.clone());
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);

        storage.set(CART_STORAGE_KEY, &format!("[{},{}]", line.replace("QTY", "1"), line.replace("QTY", "2"))).unwrap();
        let mut cart = CartStore::open(storage);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 3);
        cart.add_item(candidate(7, "150.000 đ", Some("6M"), None), None);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_price(), Vnd::new(600_000));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = Arc::new(MemoryStorage::with_quota(8));
        let mut cart = CartStore::open(storage.clone());
        cart.add_item(candidate(1, "7.500.000 đ", None, None), None);
        assert_eq!(cart.total_items(), 1);
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());

        cart.clear_cart();
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_events() {
        let mut cart = CartStore::open(Arc::new(MemoryStorage::new()));
        cart.add_item(candidate(5, "10 đ", Some("S"), None), Some(0));
        cart.add_item(candidate(5, "10 đ", Some("M"), None), Some(2));
        cart.update_quantity(5, 3);
        cart.update_quantity(99, 3);
        cart.remove_item(5);
        cart.remove_item(5);
        let events = cart.take_events();
        assert_eq!(events, vec![
            DomainEvent::Cart(CartEvent::ItemAdded { product_id: 5, name: "Sản phẩm 5".into(), quantity: 1 }),
            DomainEvent::Cart(CartEvent::ItemAdded { product_id: 5, name: "Sản phẩm 5".into(), quantity: 2 }),
            DomainEvent::Cart(CartEvent::QuantityChanged { product_id: 5, quantity: 3 }),
            DomainEvent::Cart(CartEvent::ItemRemoved { product_id: 5, name: "Sản phẩm 5".into() }),
            DomainEvent::Cart(CartEvent::ItemRemoved { product_id: 5, name: "Sản phẩm 5".into() }),
        ]);
        assert!(cart.take_events().is_empty());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(CartStore::format_price(Vnd::new(7_550_000)), "7.550.000\u{a0}₫");
    }
}
