//! MomBaby Storefront
//!
//! Client-side state core of a baby-products shop.
//!
//! ## Features
//! - Shopping cart with per-variant line items and derived totals
//! - Wishlist with at most one entry per product
//! - Both persisted to a local key-value store and restored on start
//! - Vietnamese đồng price parsing and formatting
//! - Self-expiring toast notifications
//! - Simulated checkout over a static sample catalog

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod shell;
pub mod storage;
pub mod storefront;
pub mod stores;

use thiserror::Error;

pub use catalog::{Catalog, CatalogError, CatalogQuery, SortOrder};
pub use checkout::{submit_order, CheckoutError, CheckoutRequest};
pub use config::{Config, ConfigError};
pub use domain::aggregates::{
    CartAction, CartCandidate, CartLineItem, CartState, CustomerInfo, Order, PaymentMethod, Product,
    ShippingMethod, WishlistAction, WishlistEntry, WishlistState,
};
pub use domain::value_objects::{format_price, parse_price, ProductId, Vnd};
pub use storage::{FileStorage, HydrateError, LocalStorage, MemoryStorage, SharedStorage, StorageError};
pub use storefront::Storefront;
pub use stores::{CartStore, NewToast, Notice, Toast, ToastCenter, ToastKind, WishlistStore};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Could not restore saved state: {0}")]
    Hydrate(#[from] HydrateError),

    #[error("Checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Shell(#[from] shell::ShellError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
