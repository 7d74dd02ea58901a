//! Unified error handling for the SDK.
//!
//! Each layer has its own error enum (`ApiError` for transport, `CartError`,
//! `CheckoutError` and `ThemeError` for store actions); `StorefrontError`
//! unifies them for callers that drive whole flows through [`crate::Storefront`].

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors raised by cart actions.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the variation's available stock.
    #[error("Out of stock: requested {requested}, only {available} available")]
    OutOfStock { requested: i64, available: i64 },

    /// A variable product was added without a complete option selection.
    #[error("Select a variation first")]
    VariationNotSelected,

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Errors raised by checkout actions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Store settings have not been loaded yet.
    #[error("Store settings not loaded")]
    SettingsNotLoaded,

    /// Reward-point redemption is not enabled for this store.
    #[error("Reward points are not available")]
    RewardsUnavailable,

    /// Requested more points than the customer holds.
    #[error("Not enough reward points: requested {requested}, balance {balance}")]
    RewardBalanceExceeded { requested: i64, balance: i64 },

    /// Requested fewer points than the store minimum.
    #[error("Minimum {minimum} reward points required to redeem")]
    RewardBelowMinimum { minimum: i64 },

    /// Requested more points than the store maximum.
    #[error("At most {maximum} reward points can be redeemed per order")]
    RewardAboveMaximum { maximum: i64 },

    /// Gift amount exceeds the gift card balance.
    #[error("Gift card balance too low: requested {requested}, balance {balance}")]
    GiftAmountExceedsBalance { requested: Decimal, balance: Decimal },

    /// Pickup-point delivery selected without a pickup point.
    #[error("Select a pickup point first")]
    PickupPointRequired,

    /// The backend rejected the coupon.
    #[error("Coupon rejected: {0}")]
    CouponRejected(String),

    /// The backend rejected the gift card lookup.
    #[error("Gift card rejected: {0}")]
    GiftCardRejected(String),

    /// The backend rejected the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Errors raised by theme actions.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Theme settings have not been loaded yet.
    #[error("Theme settings not loaded")]
    NotLoaded,

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// SDK-level error type unifying all layers.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Cart action failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout action failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Theme action failed.
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
