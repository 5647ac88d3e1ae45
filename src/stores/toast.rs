//! Transient notifications with per-toast expiry.
//!
//! Each toast gets its own delayed task on the current tokio runtime. Manual
//! removal aborts that task; removal by id is idempotent either way.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use uuid::Uuid;

pub type ToastId = Uuid;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewToast {
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    /// `None` or zero falls back to the center's default duration.
    pub duration: Option<Duration>,
}

impl NewToast {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self { kind, title: title.into(), ..Self::default() }
    }
    pub fn success(title: impl Into<String>) -> Self { Self::new(ToastKind::Success, title) }
    pub fn error(title: impl Into<String>) -> Self { Self::new(ToastKind::Error, title) }
    pub fn info(title: impl Into<String>) -> Self { Self::new(ToastKind::Info, title) }
    pub fn warning(title: impl Into<String>) -> Self { Self::new(ToastKind::Warning, title) }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Added,
    Removed,
}

#[derive(Debug, Default)]
struct Inner {
    toasts: Vec<Toast>,
    expiries: HashMap<ToastId, AbortHandle>,
}

/// Shared handle to the active toast list. Clones see the same list.
#[derive(Clone, Debug)]
pub struct ToastCenter {
    inner: Arc<Mutex<Inner>>,
    default_duration: Duration,
}

impl Default for ToastCenter {
    fn default() -> Self { Self::new(DEFAULT_TOAST_DURATION) }
}

impl ToastCenter {
    pub fn new(default_duration: Duration) -> Self {
        Self { inner: Arc::default(), default_duration }
    }

    pub fn toasts(&self) -> Vec<Toast> { lock(&self.inner).toasts.clone() }
    pub fn len(&self) -> usize { lock(&self.inner).toasts.len() }
    pub fn is_empty(&self) -> bool { lock(&self.inner).toasts.is_empty() }
    pub fn pending_expiries(&self) -> usize { lock(&self.inner).expiries.len() }

    /// Shows a toast and schedules its removal. Outside a tokio runtime the
    /// toast stays until removed by hand.
    pub fn add_toast(&self, toast: NewToast) -> ToastId {
        let duration = toast.duration.filter(|d| !d.is_zero()).unwrap_or(self.default_duration);
        let id = Uuid::new_v4();
        let mut inner = lock(&self.inner);
        inner.toasts.push(Toast {
            id, kind: toast.kind, title: toast.title, message: toast.message,
            duration, created_at: Utc::now(),
        });
        match Handle::try_current() {
            Ok(runtime) => {
                let task = runtime.spawn(expire(Arc::downgrade(&self.inner), id, duration));
                inner.expiries.insert(id, task.abort_handle());
            }
            Err(_) => warn!(toast = %id, "no async runtime; toast will not expire on its own"),
        }
        debug!(toast = %id, ?duration, "toast added");
        id
    }

    pub fn remove_toast(&self, id: ToastId) {
        let mut inner = lock(&self.inner);
        if let Some(expiry) = inner.expiries.remove(&id) {
            expiry.abort();
        }
        inner.toasts.retain(|t| t.id != id);
    }

    pub fn clear_toasts(&self) {
        let mut inner = lock(&self.inner);
        inner.expiries.drain().for_each(|(_, expiry)| expiry.abort());
        inner.toasts.clear();
    }

    pub fn show_cart_notification(&self, product_name: &str, notice: Notice) -> ToastId {
        let toast = match notice {
            Notice::Added => NewToast::success("Đã thêm vào giỏ hàng")
                .message(format!("{product_name} đã được thêm vào giỏ hàng")),
            Notice::Removed => NewToast::info("Đã xóa khỏi giỏ hàng")
                .message(format!("{product_name} đã được xóa khỏi giỏ hàng")),
        };
        self.add_toast(toast)
    }

    pub fn show_wishlist_notification(&self, product_name: &str, notice: Notice) -> ToastId {
        let toast = match notice {
            Notice::Added => NewToast::success("Đã thêm vào yêu thích")
                .message(format!("{product_name} đã được thêm vào danh sách yêu thích")),
            Notice::Removed => NewToast::info("Đã xóa khỏi yêu thích")
                .message(format!("{product_name} đã được xóa khỏi danh sách yêu thích")),
        };
        self.add_toast(toast)
    }
}

async fn expire(inner: Weak<Mutex<Inner>>, id: ToastId, after: Duration) {
    tokio::time::sleep(after).await;
    let Some(inner) = inner.upgrade() else { return };
    let mut inner = lock(&inner);
    inner.expiries.remove(&id);
    inner.toasts.retain(|t| t.id != id);
    debug!(toast = %id, "toast expired");
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let center = ToastCenter::default();
        let id = center.add_toast(NewToast::success("Thành công!").message("Đã thêm sản phẩm vào giỏ hàng!"));
        assert_eq!(center.toasts()[0].duration, DEFAULT_TOAST_DURATION);

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(center.toasts().iter().map(|t| t.id).collect::<Vec<_>>(), vec![id]);

        sleep(Duration::from_millis(10)).await;
        assert!(center.is_empty());
        assert_eq!(center.pending_expiries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_are_independent() {
        let center = ToastCenter::new(Duration::from_secs(5));
        let short = center.add_toast(NewToast::info("short").duration(Duration::from_secs(1)));
        let long = center.add_toast(NewToast::info("long"));
        let zero = center.add_toast(NewToast::info("zero").duration(Duration::ZERO));

        sleep(Duration::from_millis(1500)).await;
        let ids: Vec<_> = center.toasts().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![long, zero]);
        assert!(!ids.contains(&short));

        sleep(Duration::from_secs(4)).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_removal_cancels_expiry() {
        let center = ToastCenter::default();
        let first = center.add_toast(NewToast::error("Lỗi"));
        let second = center.add_toast(NewToast::info("Thông tin"));
        assert_eq!(center.pending_expiries(), 2);

        center.remove_toast(first);
        center.remove_toast(first);
        assert_eq!(center.pending_expiries(), 1);
        assert_eq!(center.toasts()[0].id, second);

        sleep(Duration::from_secs(4)).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_aborts_everything() {
        let center = ToastCenter::default();
        center.show_cart_notification("Xe đẩy Joie", Notice::Added);
        center.show_wishlist_notification("Xe đẩy Joie", Notice::Removed);
        center.clear_toasts();
        assert!(center.is_empty());
        assert_eq!(center.pending_expiries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_texts() {
        let center = ToastCenter::default();
        center.show_cart_notification("Sữa bột Aptamil", Notice::Removed);
        center.show_wishlist_notification("Sữa bột Aptamil", Notice::Added);
        let toasts = center.toasts();
        assert_eq!(toasts[0].kind, ToastKind::Info);
        assert_eq!(toasts[0].title, "Đã xóa khỏi giỏ hàng");
        assert_eq!(toasts[0].message.as_deref(), Some("Sữa bột Aptamil đã được xóa khỏi giỏ hàng"));
        assert_eq!(toasts[1].kind, ToastKind::Success);
        assert_eq!(toasts[1].message.as_deref(), Some("Sữa bột Aptamil đã được thêm vào danh sách yêu thích"));
    }

    #[test]
    fn test_without_runtime_toasts_stay() {
        let center = ToastCenter::default();
        let id = center.add_toast(NewToast::info("offline"));
        assert_eq!(center.pending_expiries(), 0);
        center.remove_toast(id);
        assert!(center.is_empty());
    }
}
