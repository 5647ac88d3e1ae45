//! The storefront context: one cart, one wishlist, one toast center.
//!
//! Surfaces receive `&mut Storefront` and go through the flows here so that
//! store changes and shopper notifications stay in step.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::checkout::{submit_order, CheckoutError, CheckoutRequest};
use crate::config::Config;
use crate::domain::aggregates::Order;
use crate::domain::events::{CartEvent, DomainEvent, WishlistEvent};
use crate::domain::value_objects::ProductId;
use crate::storage::{FileStorage, MemoryStorage, SharedStorage};
use crate::stores::{CartStore, NewToast, Notice, ToastCenter, ToastId, WishlistStore};

#[derive(Debug)]
pub struct Storefront {
    wishlist: WishlistStore,
    cart: CartStore,
    toasts: ToastCenter,
    catalog: Catalog,
    checkout_latency: Duration,
}

impl Storefront {
    /// Opens the file-backed storage named by `config`. If the directory
    /// cannot be used the session runs on in-memory storage instead.
    pub fn open(config: &Config) -> Self {
        let (storage, durable): (SharedStorage, bool) = match FileStorage::open(&config.storage_dir) {
            Ok(files) => {
                info!(dir = %files.dir().display(), "using file storage");
                let files = match config.storage_quota {
                    Some(quota) => files.with_quota(quota),
                    None => files,
                };
                (Arc::new(files), true)
            }
            Err(e) => {
                warn!(dir = %config.storage_dir.display(), error = %e, "storage unavailable; nothing will be kept after exit");
                (Arc::new(config.storage_quota.map_or_else(MemoryStorage::new, MemoryStorage::with_quota)), false)
            }
        };
        let shop = Self::with_storage(storage, config);
        if !durable {
            shop.toasts.add_toast(
                NewToast::warning("Không thể lưu dữ liệu")
                    .message("Giỏ hàng và danh sách yêu thích sẽ không được lưu lại"),
            );
        }
        shop
    }

    pub fn with_storage(storage: SharedStorage, config: &Config) -> Self {
        let wishlist = WishlistStore::open(storage.clone());
        let cart = CartStore::open(storage);
        Self {
            wishlist,
            cart,
            toasts: ToastCenter::new(config.toast_duration),
            catalog: Catalog::sample(),
            checkout_latency: config.checkout_latency,
        }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn cart(&self) -> &CartStore { &self.cart }
    pub fn cart_mut(&mut self) -> &mut CartStore { &mut self.cart }
    pub fn wishlist(&self) -> &WishlistStore { &self.wishlist }
    pub fn wishlist_mut(&mut self) -> &mut WishlistStore { &mut self.wishlist }
    pub fn toasts(&self) -> &ToastCenter { &self.toasts }

    /// Adds a catalog product in the chosen variant. A bad selection is shown
    /// to the shopper as an error toast and returned.
    pub fn add_to_cart(&mut self, id: ProductId, size: Option<&str>, color: Option<&str>, quantity: Option<u32>) -> Result<(), CatalogError> {
        let candidate = self.catalog.require(id)
            .and_then(|p| p.cart_candidate(size, color).map_err(CatalogError::from));
        match candidate {
            Ok(candidate) => {
                self.cart.add_item(candidate, quantity);
                self.flush_notifications();
                Ok(())
            }
            Err(e) => {
                self.toasts.add_toast(NewToast::error("Lỗi").message(e.user_message()));
                Err(e)
            }
        }
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.remove_item(id);
        self.flush_notifications();
    }

    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        self.cart.update_quantity(id, quantity);
        self.flush_notifications();
    }

    /// Returns whether the product is saved afterwards.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Result<bool, CatalogError> {
        let entry = self.catalog.require(id)?.wishlist_entry();
        let saved = self.wishlist.toggle_item(entry);
        self.flush_notifications();
        Ok(saved)
    }

    /// Turns pending store events into toasts.
    pub fn flush_notifications(&mut self) -> Vec<ToastId> {
        let mut events = self.wishlist.take_events();
        events.extend(self.cart.take_events());
        events.into_iter()
            .filter_map(|event| match event {
                DomainEvent::Cart(CartEvent::ItemAdded { name, .. }) => Some(self.toasts.show_cart_notification(&name, Notice::Added)),
                DomainEvent::Cart(CartEvent::ItemRemoved { name, .. }) => Some(self.toasts.show_cart_notification(&name, Notice::Removed)),
                DomainEvent::Wishlist(WishlistEvent::Added { name, .. }) => Some(self.toasts.show_wishlist_notification(&name, Notice::Added)),
                DomainEvent::Wishlist(WishlistEvent::Removed { name, .. }) => Some(self.toasts.show_wishlist_notification(&name, Notice::Removed)),
                DomainEvent::Cart(CartEvent::QuantityChanged { .. } | CartEvent::Cleared) | DomainEvent::Wishlist(WishlistEvent::Cleared) => None,
            })
            .collect()
    }

    pub async fn checkout(&mut self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        match submit_order(&mut self.cart, request, self.checkout_latency).await {
            Ok(order) => {
                self.cart.take_events();
                self.toasts.add_toast(
                    NewToast::success("Đặt hàng thành công!")
                        .message(format!("Đơn hàng #{} đã được tạo. Chúng tôi sẽ liên hệ với bạn sớm nhất.", order.id)),
                );
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "checkout rejected");
                self.toasts.add_toast(NewToast::error("Lỗi").message(e.user_message()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::order::tests::customer;
    use crate::domain::aggregates::{PaymentMethod, ProductError, ShippingMethod};
    use crate::domain::value_objects::Vnd;
    use crate::stores::ToastKind;

    fn storefront() -> Storefront {
        let config = Config { checkout_latency: Duration::from_millis(2000), ..Config::default() };
        Storefront::with_storage(Arc::new(MemoryStorage::new()), &config)
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest { customer: customer(), shipping: ShippingMethod::Standard, payment: PaymentMethod::Momo, agree_terms: true }
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_notifies() {
        let mut shop = storefront();
        shop.add_to_cart(2, Some("6M"), Some("Hồng"), Some(2)).unwrap();
        assert_eq!(shop.cart().total_items(), 2);
        assert_eq!(shop.cart().total_price(), Vnd::new(640_000));

        let toasts = shop.toasts().toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Đã thêm vào giỏ hàng");
        assert_eq!(toasts[0].message.as_deref(), Some("Bộ quần áo cotton organic đã được thêm vào giỏ hàng"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_selection_shows_error() {
        let mut shop = storefront();
        assert_eq!(shop.add_to_cart(2, None, Some("Hồng"), None), Err(CatalogError::Selection(ProductError::SizeRequired(2))));
        assert_eq!(shop.add_to_cart(99, None, None, None), Err(CatalogError::UnknownProduct(99)));
        assert!(shop.cart().is_empty());
        let toasts = shop.toasts().toasts();
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| t.kind == ToastKind::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wishlist_toggle_notifies_each_way() {
        let mut shop = storefront();
        assert!(shop.toggle_wishlist(3).unwrap());
        assert!(!shop.toggle_wishlist(3).unwrap());
        let titles: Vec<_> = shop.toasts().toasts().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Đã thêm vào yêu thích", "Đã xóa khỏi yêu thích"]);
        assert_eq!(shop.wishlist().total_items(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quantity_changes_are_silent_until_removal() {
        let mut shop = storefront();
        shop.add_to_cart(3, None, None, None).unwrap();
        shop.toasts().clear_toasts();
        shop.update_quantity(3, 5);
        assert!(shop.toasts().is_empty());
        shop.update_quantity(3, 0);
        assert_eq!(shop.toasts().toasts()[0].title, "Đã xóa khỏi giỏ hàng");
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_success_and_failure() {
        let mut shop = storefront();
        let err = shop.checkout(request()).await.unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(shop.toasts().toasts()[0].message.as_deref(), Some("Giỏ hàng trống"));
        shop.toasts().clear_toasts();

        shop.add_to_cart(1, None, Some("Đen"), None).unwrap();
        shop.toasts().clear_toasts();
        let order = shop.checkout(request()).await.unwrap();
        assert_eq!(order.total, Vnd::new(7_500_000));
        assert!(shop.cart().is_empty());

        let toasts = shop.toasts().toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Đặt hàng thành công!");
        assert!(toasts[0].message.as_deref().unwrap_or_default().contains(&order.id));
        assert!(shop.flush_notifications().is_empty());
    }

    #[test]
    fn test_open_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let config = Config { storage_dir: blocker, ..Config::default() };
        let mut shop = Storefront::open(&config);
        let toasts = shop.toasts().toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Warning);
        let milk = shop.catalog().get(3).unwrap().cart_candidate(None, None).unwrap();
        shop.cart_mut().add_item(milk, None);
        assert_eq!(shop.cart().total_items(), 1);
    }

    #[test]
    fn test_open_with_directory_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let shop = Storefront::open(&Config { storage_dir: dir.path().to_path_buf(), ..Config::default() });
        assert!(shop.toasts().is_empty());
    }
}
