//! Cart Aggregate
//!
//! `CartState` is only ever produced by [`CartState::reduce`], which keeps the
//! totals a pure function of the line items.

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{ProductId, Vnd};

/// A product as offered to the cart, before a quantity is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartCandidate {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: String,
    pub category: String,
    pub brand: Option<String>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

/// One cart line. Stored as-is in the persisted JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    pub image: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

/// `(id, size, color)`; an absent selector only matches another absent one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineIdentity<'a> {
    pub id: ProductId,
    pub size: Option<&'a str>,
    pub color: Option<&'a str>,
}

impl CartCandidate {
    pub fn identity(&self) -> LineIdentity<'_> {
        LineIdentity { id: self.id, size: self.selected_size.as_deref(), color: self.selected_color.as_deref() }
    }
}

impl CartLineItem {
    pub fn from_candidate(candidate: CartCandidate, quantity: u32) -> Self {
        Self {
            id: candidate.id, name: candidate.name, price: candidate.price,
            original_price: candidate.original_price, image: candidate.image,
            category: candidate.category, brand: candidate.brand, quantity,
            selected_size: candidate.selected_size, selected_color: candidate.selected_color,
        }
    }

    pub fn identity(&self) -> LineIdentity<'_> {
        LineIdentity { id: self.id, size: self.selected_size.as_deref(), color: self.selected_color.as_deref() }
    }

    pub fn unit_price(&self) -> Vnd { Vnd::parse(&self.price) }
    pub fn line_total(&self) -> Vnd { self.unit_price().times(self.quantity) }
}

/// Every transition the cart knows about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// `None` and `Some(0)` both add a single unit.
    AddItem { candidate: CartCandidate, quantity: Option<u32> },
    /// Drops every line carrying this id, whatever its size or color.
    RemoveItem(ProductId),
    /// Matches on id alone. A quantity of zero or less removes the lines instead.
    UpdateQuantity { id: ProductId, quantity: i64 },
    ClearCart,
    ToggleCart,
    OpenCart,
    CloseCart,
    LoadCart(Vec<CartLineItem>),
}

impl CartAction {
    /// Whether the durable copy of the items has to be rewritten after this action.
    pub fn persists(&self) -> bool {
        matches!(self, Self::AddItem { .. } | Self::RemoveItem(_) | Self::UpdateQuantity { .. } | Self::ClearCart)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartLineItem>,
    total_items: u64,
    total_price: Vnd,
    is_open: bool,
}

impl CartState {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartLineItem] { &self.items }
    pub fn total_items(&self) -> u64 { self.total_items }
    pub fn total_price(&self) -> Vnd { self.total_price }
    pub fn is_open(&self) -> bool { self.is_open }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn line_count(&self) -> usize { self.items.len() }

    pub fn find(&self, identity: LineIdentity<'_>) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.identity() == identity)
    }

    /// The cart's transition function.
    pub fn reduce(self, action: CartAction) -> Self {
        let Self { mut items, is_open, .. } = self;
        match action {
            CartAction::AddItem { candidate, quantity } => {
                let quantity = match quantity { None | Some(0) => 1, Some(q) => q };
                let identity = candidate.identity();
                match items.iter_mut().find(|i| i.identity() == identity) {
                    Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                    None => items.push(CartLineItem::from_candidate(candidate, quantity)),
                }
                Self::with_items(items, is_open)
            }
            CartAction::RemoveItem(id) => {
                items.retain(|i| i.id != id);
                Self::with_items(items, is_open)
            }
            CartAction::UpdateQuantity { id, quantity } if quantity <= 0 => {
                items.retain(|i| i.id != id);
                Self::with_items(items, is_open)
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                    item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
                Self::with_items(items, is_open)
            }
            CartAction::ClearCart => Self::with_items(Vec::new(), is_open),
            CartAction::ToggleCart => Self::with_items(items, !is_open),
            CartAction::OpenCart => Self::with_items(items, true),
            CartAction::CloseCart => Self::with_items(items, false),
            CartAction::LoadCart(loaded) => Self::with_items(normalize(loaded), is_open),
        }
    }

    fn with_items(items: Vec<CartLineItem>, is_open: bool) -> Self {
        let total_items = items.iter().map(|i| u64::from(i.quantity)).sum();
        let total_price = items.iter().map(CartLineItem::line_total).sum();
        Self { items, total_items, total_price, is_open }
    }
}

/// Drops empty lines and folds repeated identities into their first line.
fn normalize(loaded: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut items: Vec<CartLineItem> = Vec::with_capacity(loaded.len());
    for line in loaded.into_iter().filter(|l| l.quantity > 0) {
        match items.iter_mut().find(|i| i.identity() == line.identity()) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => items.push(line),
        }
    }
    items
}
