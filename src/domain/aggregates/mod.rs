//! Aggregates module
pub mod cart;
pub mod wishlist;
pub mod product;
pub mod order;

pub use cart::{CartAction, CartCandidate, CartLineItem, CartState, LineIdentity};
pub use wishlist::{WishlistAction, WishlistEntry, WishlistState};
pub use product::{Product, ProductError};
pub use order::{CustomerInfo, Order, OrderStatus, PaymentMethod, ShippingMethod, UnknownOption};
