//! Order Aggregate
//!
//! Orders are built locally at checkout and never sent anywhere.

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};
use crate::domain::aggregates::CartLineItem;
use crate::domain::value_objects::Vnd;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1), email)]
    pub email: String,
    #[validate(length(min = 1), custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub district: String,
    #[validate(length(min = 1))]
    pub ward: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Field order in which a missing value is reported.
pub const REQUIRED_FIELDS: [&str; 7] = ["full_name", "email", "phone", "address", "city", "district", "ward"];

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits_only = phone.chars().all(|c| c.is_ascii_digit());
    if digits_only && (10..=11).contains(&phone.len()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    pub fn fee(&self) -> Vnd {
        match self { Self::Standard => Vnd::ZERO, Self::Express => Vnd::new(50_000) }
    }
    pub fn label(&self) -> &'static str {
        match self { Self::Standard => "Giao hàng tiêu chuẩn", Self::Express => "Giao hàng nhanh" }
    }
    pub fn delivery_window(&self) -> &'static str {
        match self { Self::Standard => "3-5 ngày", Self::Express => "1-2 ngày" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Banking,
    Momo,
    ZaloPay,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cod => "Thanh toán khi nhận hàng",
            Self::Banking => "Chuyển khoản ngân hàng",
            Self::Momo => "Ví MoMo",
            Self::ZaloPay => "ZaloPay",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown option {0:?}")]
pub struct UnknownOption(pub String);

impl FromStr for ShippingMethod {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::Cod),
            "banking" => Ok(Self::Banking),
            "momo" => Ok(Self::Momo),
            "zalopay" => Ok(Self::ZaloPay),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("pending") }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_info: CustomerInfo,
    pub items: Vec<CartLineItem>,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    pub subtotal: Vnd,
    pub shipping_fee: Vnd,
    pub total: Vnd,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn place(
        customer_info: CustomerInfo,
        items: Vec<CartLineItem>,
        subtotal: Vnd,
        shipping_method: ShippingMethod,
        payment_method: PaymentMethod,
    ) -> Self {
        let shipping_fee = shipping_method.fee();
        Self {
            id: Uuid::now_v7().simple().to_string(),
            customer_info, items, payment_method, shipping_method,
            subtotal, shipping_fee, total: subtotal.add(shipping_fee),
            status: OrderStatus::Pending, created_at: Utc::now(),
        }
    }

    pub fn item_count(&self) -> u64 { self.items.iter().map(|i| u64::from(i.quantity)).sum() }
}
