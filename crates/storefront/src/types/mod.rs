//! Domain types for the storefront backend API.
//!
//! These types mirror the backend's JSON wire format. Quantities are `i64`,
//! money and weights are `rust_decimal::Decimal` (the backend sends both as
//! strings or bare numbers; `Decimal` accepts either).

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod home;
pub mod product;
pub mod settings;
pub mod theme;

pub use cart::{CartItem, CartItemDetail};
pub use catalog::{Branch, Brand, Category, FeaturedCategory, Offer};
pub use checkout::{
    CheckoutTotals, Coupon, DeliveryZone, GiftCard, GuestAddress, OrderOutcome, OrderRequest,
    PaymentMethod,
};
pub use customer::{Address, Customer};
pub use home::{HomeContent, HomeSection, Slider};
pub use product::{
    FacetGroup, Facets, Media, PaginationMode, Product, ProductAttribute, ProductKind,
    ProductPage, SortKey, Variation, VariationAxis,
};
pub use settings::{RewardPointRules, StoreSettings};
pub use theme::ThemeChange;
