//! Wire envelopes for backend mutations.
//!
//! Write endpoints (coupon checks, gift card lookups, order placement) wrap
//! their payload in a `status`/`message` envelope instead of using HTTP
//! status codes. The message field is inconsistent across endpoints: some
//! return a plain string, others a list of per-field validation objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{AddressId, OrderId};

use crate::types::{CartItem, DeliveryZone, GiftCard, PaymentMethod, Product};

/// Envelope outcome reported by write endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ApiStatus {
    Success,
    Error,
}

impl ApiStatus {
    /// Returns `true` for the success variant.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMessage {
    pub message: String,
}

/// Error message payload, either a plain string or a list of field errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    Fields(Vec<FieldMessage>),
}

impl ApiMessage {
    /// The first human-readable message in the payload.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Fields(fields) => fields.first().map_or("", |field| field.message.as_str()),
        }
    }
}

/// Request body for `POST coupons/check`.
///
/// The backend validates coupons against the order it would produce, so this
/// mirrors the order payload shape.
#[derive(Debug, Clone, Serialize)]
pub struct CouponCheckRequest<'a> {
    pub address_id: Option<AddressId>,
    pub items: &'a [CartItem],
    pub delivered_to: DeliveryZone,
    pub shipping_note: Option<&'a str>,
    pub source: &'static str,
    pub payment_method: PaymentMethod,
    pub coupon_code: &'a str,
}

/// Response body for `POST coupons/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponCheckResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<ApiMessage>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub shipping_charge_discount: Option<Decimal>,
}

/// Response body for `GET gift-cards/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardLookupResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<ApiMessage>,
    #[serde(default)]
    pub data: Option<GiftCard>,
}

/// Response body for `POST orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<ApiMessage>,
    /// Present on success. The one camelCase field the backend sends.
    #[serde(default, rename = "orderId")]
    pub order_id: Option<OrderId>,
}

/// Response body for the unpaginated product selections
/// (`GET trending-products`, `GET latest-products`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    pub data: Vec<Product>,
}

// ==== Tests ====
