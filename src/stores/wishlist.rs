//! Wishlist store.

use tracing::{debug, error, warn};

use crate::domain::aggregates::{WishlistAction, WishlistEntry, WishlistState};
use crate::domain::events::{DomainEvent, WishlistEvent};
use crate::domain::value_objects::ProductId;
use crate::storage::{load_json, save_json, SharedStorage};

pub const WISHLIST_STORAGE_KEY: &str = "mombaby-wishlist";

#[derive(Debug)]
pub struct WishlistStore {
    state: WishlistState,
    storage: SharedStorage,
    events: Vec<DomainEvent>,
}

impl WishlistStore {
    pub fn open(storage: SharedStorage) -> Self {
        let mut store = Self { state: WishlistState::new(), storage, events: vec![] };
        match load_json::<Vec<WishlistEntry>>(store.storage.as_ref(), WISHLIST_STORAGE_KEY) {
            Ok(Some(items)) => {
                debug!(entries = items.len(), "restored saved wishlist");
                store.dispatch(WishlistAction::LoadWishlist(items));
            }
            Ok(None) => debug!("no saved wishlist"),
            Err(e) => warn!(key = WISHLIST_STORAGE_KEY, error = %e, "ignoring unreadable saved wishlist"),
        }
        store
    }

    pub fn items(&self) -> &[WishlistEntry] { self.state.items() }
    pub fn total_items(&self) -> usize { self.state.total_items() }
    pub fn is_in_wishlist(&self, id: ProductId) -> bool { self.state.contains(id) }

    pub fn add_item(&mut self, entry: WishlistEntry) {
        let event = (!self.is_in_wishlist(entry.id))
            .then(|| WishlistEvent::Added { product_id: entry.id, name: entry.name.clone() });
        self.dispatch(WishlistAction::AddItem(entry));
        if let Some(e) = event {
            self.raise(e);
        }
    }

    pub fn remove_item(&mut self, id: ProductId) {
        let event = self.state.get(id).map(|e| WishlistEvent::Removed { product_id: id, name: e.name.clone() });
        self.dispatch(WishlistAction::RemoveItem(id));
        if let Some(e) = event {
            self.raise(e);
        }
    }

    /// Removes the entry if saved, adds it otherwise. Returns whether it is saved afterwards.
    pub fn toggle_item(&mut self, entry: WishlistEntry) -> bool {
        if self.is_in_wishlist(entry.id) {
            self.remove_item(entry.id);
            false
        } else {
            self.add_item(entry);
            true
        }
    }

    pub fn clear_wishlist(&mut self) {
        self.dispatch(WishlistAction::ClearWishlist);
        self.raise(WishlistEvent::Cleared);
    }

    /// Drains pending events; like the cart, nothing is dropped until this is called.
    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }

    fn dispatch(&mut self, action: WishlistAction) {
        let persists = action.persists();
        self.state = std::mem::take(&mut self.state).reduce(action);
        if persists {
            match save_json(self.storage.as_ref(), WISHLIST_STORAGE_KEY, self.state.items()) {
                Ok(()) => debug!(entries = self.state.total_items(), "saved wishlist"),
                Err(e) => error!(key = WISHLIST_STORAGE_KEY, error = %e, "failed to save wishlist; keeping in-memory state"),
            }
        }
    }

    fn raise(&mut self, e: WishlistEvent) { self.events.push(DomainEvent::Wishlist(e)); }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;
    use crate::domain::aggregates::wishlist::tests::entry;
    use crate::storage::{LocalStorage, MemoryStorage};
    use crate::stores::CART_STORAGE_KEY;

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut wishlist = WishlistStore::open(Arc::new(MemoryStorage::new()));
        assert!(wishlist.toggle_item(entry(3, "Sữa bột")));
        assert!(wishlist.is_in_wishlist(3));
        assert!(!wishlist.toggle_item(entry(3, "Sữa bột")));
        assert!(!wishlist.is_in_wishlist(3));

        wishlist.add_item(entry(1, "a"));
        wishlist.toggle_item(entry(1, "a"));
        wishlist.toggle_item(entry(1, "a"));
        assert!(wishlist.is_in_wishlist(1));
        assert_eq!(wishlist.total_items(), 1);
    }

    #[test]
    fn test_duplicate_add_keeps_first_entry() {
        let mut wishlist = WishlistStore::open(Arc::new(MemoryStorage::new()));
        wishlist.add_item(entry(4, "first"));
        wishlist.add_item(entry(4, "second"));
        assert_eq!(wishlist.total_items(), 1);
        assert_eq!(wishlist.items()[0].name, "first");
        assert_eq!(wishlist.take_events().len(), 1);
    }

    #[test]
    fn test_restart_round_trip_uses_own_key() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = WishlistStore::open(storage.clone());
        wishlist.add_item(entry(1, "a"));
        wishlist.add_item(entry(2, "b"));
        wishlist.remove_item(1);
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());

        let restarted = WishlistStore::open(storage);
        assert_eq!(restarted.items(), wishlist.items());
        assert_eq!(restarted.total_items(), 1);
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(WISHLIST_STORAGE_KEY, "[{\"id\":1,").unwrap();
        let wishlist = WishlistStore::open(storage);
        assert_eq!(wishlist.total_items(), 0);
    }

    #[test]
    fn test_clear_and_events() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = WishlistStore::open(storage.clone());
        wishlist.toggle_item(entry(1, "a"));
        wishlist.toggle_item(entry(1, "a"));
        wishlist.remove_item(1);
        wishlist.add_item(entry(2, "b"));
        wishlist.clear_wishlist();
        assert_eq!(storage.get(WISHLIST_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(wishlist.take_events(), vec![
            DomainEvent::Wishlist(WishlistEvent::Added { product_id: 1, name: "a".into() }),
            DomainEvent::Wishlist(WishlistEvent::Removed { product_id: 1, name: "a".into() }),
            DomainEvent::Wishlist(WishlistEvent::Added { product_id: 2, name: "b".into() }),
            DomainEvent::Wishlist(WishlistEvent::Cleared),
        ]);
    }
}
