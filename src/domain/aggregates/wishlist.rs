//! Wishlist Aggregate

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    pub image: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// 0 to 5 stars.
    pub rating: f64,
    pub reviews: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WishlistAction {
    /// No-op when the id is already saved; the stored entry is kept.
    AddItem(WishlistEntry),
    RemoveItem(ProductId),
    ClearWishlist,
    LoadWishlist(Vec<WishlistEntry>),
}

impl WishlistAction {
    pub fn persists(&self) -> bool { !matches!(self, Self::LoadWishlist(_)) }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WishlistState {
    items: Vec<WishlistEntry>,
}

impl WishlistState {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[WishlistEntry] { &self.items }
    pub fn total_items(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn contains(&self, id: ProductId) -> bool { self.items.iter().any(|i| i.id == id) }
    pub fn get(&self, id: ProductId) -> Option<&WishlistEntry> { self.items.iter().find(|i| i.id == id) }

    pub fn reduce(self, action: WishlistAction) -> Self {
        let mut items = self.items;
        match action {
            WishlistAction::AddItem(entry) => {
                if !items.iter().any(|i| i.id == entry.id) {
                    items.push(entry);
                }
            }
            WishlistAction::RemoveItem(id) => items.retain(|i| i.id != id),
            WishlistAction::ClearWishlist => items.clear(),
            WishlistAction::LoadWishlist(loaded) => {
                // First occurrence of an id wins, same as repeated adds.
                let mut seen = HashSet::with_capacity(loaded.len());
                items = loaded.into_iter().filter(|i| seen.insert(i.id)).collect();
            }
        }
        Self { items }
    }
}
