//! Domain events
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { product_id: ProductId, name: String, quantity: u32 },
    ItemRemoved { product_id: ProductId, name: String },
    QuantityChanged { product_id: ProductId, quantity: u32 },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { product_id: ProductId, name: String },
    Removed { product_id: ProductId, name: String },
    Cleared,
}
