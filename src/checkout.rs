//! Checkout: validate the form, simulate the submission, empty the cart.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

use crate::domain::aggregates::order::REQUIRED_FIELDS;
use crate::domain::aggregates::{CustomerInfo, Order, PaymentMethod, ShippingMethod};
use crate::domain::value_objects::Vnd;
use crate::stores::CartStore;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
    pub shipping: ShippingMethod,
    pub payment: PaymentMethod,
    pub agree_terms: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("missing required field {0}")]
    MissingField(&'static str),
    #[error("terms and conditions not accepted")]
    TermsNotAccepted,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("cart is empty")]
    EmptyCart,
}

impl CheckoutError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "Vui lòng điền đầy đủ thông tin bắt buộc",
            Self::TermsNotAccepted => "Vui lòng đồng ý với điều khoản và điều kiện",
            Self::InvalidEmail => "Email không hợp lệ",
            Self::InvalidPhone => "Số điện thoại không hợp lệ",
            Self::EmptyCart => "Giỏ hàng trống",
        }
    }
}

impl CheckoutRequest {
    /// Checks the form in the order the shopper is told about problems:
    /// blanks, terms, email, phone.
    pub fn check(&self) -> Result<(), CheckoutError> {
        let errors = self.customer.validate().err();
        let failed = |field: &str, code: &str| {
            errors.as_ref()
                .and_then(|e| e.field_errors().get(field).map(|list| list.iter().any(|err| err.code == code)))
                .unwrap_or(false)
        };

        if let Some(field) = REQUIRED_FIELDS.into_iter().find(|f| failed(f, "length")) {
            return Err(CheckoutError::MissingField(field));
        }
        if !self.agree_terms {
            return Err(CheckoutError::TermsNotAccepted);
        }
        if failed("email", "email") {
            return Err(CheckoutError::InvalidEmail);
        }
        if failed("phone", "phone") {
            return Err(CheckoutError::InvalidPhone);
        }
        Ok(())
    }

    pub fn total_for(&self, subtotal: Vnd) -> Vnd { subtotal.add(self.shipping.fee()) }
}

/// Places an order from the current cart. The order is only logged; on
/// success the cart is cleared and the order handed back to the caller.
pub async fn submit_order(cart: &mut CartStore, request: CheckoutRequest, latency: Duration) -> Result<Order, CheckoutError> {
    request.check()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    tokio::time::sleep(latency).await;

    let order = Order::place(request.customer, cart.items().to_vec(), cart.total_price(), request.shipping, request.payment);
    info!(order_id = %order.id, items = order.item_count(), total = %order.total, "order created");
    if let Ok(json) = serde_json::to_string(&order) {
        debug!(order = %json, "order payload");
    }
    cart.clear_cart();
    Ok(order)
}
