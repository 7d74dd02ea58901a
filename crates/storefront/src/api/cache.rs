//! Cache types for backend API responses.

use crate::types::{Product, StoreSettings};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Settings(Box<StoreSettings>),
}
