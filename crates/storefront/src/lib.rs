//! Velvet Tamarind Storefront SDK.
//!
//! A headless client for the Velvet Tamarind commerce backend. The SDK pairs
//! a typed REST API client with in-memory session stores (cart, checkout,
//! catalog, theme) and the derived values a storefront UI needs: cart totals,
//! shipping charges, reward-point redemption, coupon and gift-card state.
//!
//! # Example
//!
//! ```rust,ignore
//! use velvet_tamarind_storefront::{Storefront, StorefrontConfig};
//! use velvet_tamarind_storefront::types::CartItem;
//!
//! let config = StorefrontConfig::from_env()?;
//! let mut shop = Storefront::new(config)?;
//! shop.bootstrap().await;
//!
//! shop.add_to_cart(CartItem::new(12.into(), 104.into(), 2)).await?;
//!
//! let totals = shop.totals()?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod payment;
pub mod stores;
pub mod types;

pub use api::{ApiClient, ApiError, ProductQuery};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{CartError, CheckoutError, Result, StorefrontError, ThemeError};
pub use payment::{
    PaymentError, PaymentHandler, PaymentOutcome, PaymentRequest, UnconfiguredPayment,
};
pub use stores::Storefront;
