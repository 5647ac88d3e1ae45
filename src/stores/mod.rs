//! Application state containers used by every surface.
pub mod cart;
pub mod toast;
pub mod wishlist;

pub use cart::{CartStore, CART_STORAGE_KEY};
pub use toast::{NewToast, Notice, Toast, ToastCenter, ToastId, ToastKind, DEFAULT_TOAST_DURATION};
pub use wishlist::{WishlistStore, WISHLIST_STORAGE_KEY};
