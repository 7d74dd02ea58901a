//! REST client for the storefront backend.
//!
//! JSON over REST with `reqwest`. Catalog reads are cached using `moka`
//! (5-minute TTL). The customer session travels as an `access-token` cookie,
//! the same cookie the browser storefront sends.

mod cache;
pub mod envelope;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use velvet_tamarind_core::{BrandId, ProductId, VariationId};

use crate::config::StorefrontConfig;
use crate::types::{
    Branch, Brand, CartItem, Category, Customer, Facets, HomeContent, Offer, OrderRequest,
    Product, ProductPage, SortKey, StoreSettings,
};

use cache::CacheValue;
use envelope::{
    CouponCheckRequest, CouponCheckResponse, GiftCardLookupResponse, OrderResponse,
    ProductListResponse,
};

// =============================================================================
// Error Types
// =============================================================================

/// Errors from the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Response parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend API.
///
/// Cheap to clone; clones share the HTTP connection pool, the response cache
/// and the session token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// API base URL without a trailing slash.
    base: String,
    media_base: Url,
    token: RwLock<Option<SecretString>>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                media_base: config.media_base_url.clone(),
                token: RwLock::new(config.access_token.clone()),
                cache,
            }),
        })
    }

    // =========================================================================
    // Session Token
    // =========================================================================

    /// Attach a customer session token to subsequent requests.
    pub fn set_access_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = Some(token);
        }
    }

    /// Drop the customer session token.
    pub fn clear_access_token(&self) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = None;
        }
    }

    /// Whether a session token is attached.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.inner.token.read().is_ok_and(|guard| guard.is_some())
    }

    fn session_cookie(&self) -> Option<HeaderValue> {
        let guard = self.inner.token.read().ok()?;
        let token = guard.as_ref()?;
        HeaderValue::from_str(&format!("access-token={}", token.expose_secret())).ok()
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base)
    }

    /// Send a request and decode the JSON response.
    async fn request<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let builder = match self.session_cookie() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(resource.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(self.inner.client.get(self.url(path)), path)
            .await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        self.request(self.inner.client.get(self.url(path)).query(query), path)
            .await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(self.inner.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(self.inner.client.put(self.url(path)).json(body), path)
            .await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let mut page: ProductPage = self
            .get_with_query("products", &query.to_query_pairs())
            .await?;
        for product in &mut page.data {
            self.resolve_product_media(product);
        }
        Ok(page)
    }

    /// Get products by ID, up to one page of 100.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let query = vec![
            ("ids".to_string(), joined),
            ("per_page".to_string(), "100".to_string()),
        ];

        let mut page: ProductPage = self.get_with_query("products", &query).await?;
        for product in &mut page.data {
            self.resolve_product_media(product);
        }
        Ok(page.data)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let mut product: Product = self.get(&format!("products/{slug}")).await?;
        self.resolve_product_media(&mut product);

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get live stock for a variation.
    ///
    /// The endpoint returns a bare number; zero means the backend does not
    /// track stock for this variation.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id, variation_id = %variation_id))]
    pub async fn product_stock(
        &self,
        product_id: ProductId,
        variation_id: VariationId,
    ) -> Result<i64, ApiError> {
        let query = vec![
            ("product_id".to_string(), product_id.to_string()),
            ("variation_id".to_string(), variation_id.to_string()),
        ];
        self.get_with_query("product-stock", &query).await
    }

    /// Get filter facets for the listing context in `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn facets(&self, query: &ProductQuery) -> Result<Facets, ApiError> {
        self.get_with_query("filters", &query.to_query_pairs())
            .await
    }

    /// Get the trending product selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn trending_products(&self) -> Result<Vec<Product>, ApiError> {
        let mut response: ProductListResponse = self.get("trending-products").await?;
        for product in &mut response.data {
            self.resolve_product_media(product);
        }
        Ok(response.data)
    }

    /// Get the latest product selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn latest_products(&self) -> Result<Vec<Product>, ApiError> {
        let mut response: ProductListResponse = self.get("latest-products").await?;
        for product in &mut response.data {
            self.resolve_product_media(product);
        }
        Ok(response.data)
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the category tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let mut categories: Vec<Category> = self.get("categories").await?;
        for category in &mut categories {
            self.resolve_category_media(category);
        }
        Ok(categories)
    }

    /// Get all brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.get("brands").await
    }

    /// Get all offers, including scheduled and expired ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("offers").await
    }

    /// Get all store branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn branches(&self) -> Result<Vec<Branch>, ApiError> {
        self.get("branches").await
    }

    /// Get home page content (sliders, sections, featured category paths).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn home_content(&self) -> Result<HomeContent, ApiError> {
        let mut content: HomeContent = self.get("home").await?;
        for slider in &mut content.sliders {
            slider.image_url = self.resolve_media_url(&slider.image_url);
        }
        Ok(content)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the signed-in customer's saved cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        self.get("cart-items").await
    }

    // =========================================================================
    // Checkout Methods
    // =========================================================================

    /// Validate a coupon code against the order it would apply to.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. A rejected coupon is a
    /// success at this level; the envelope carries the rejection.
    #[instrument(skip(self, request), fields(coupon_code = %request.coupon_code))]
    pub async fn check_coupon(
        &self,
        request: &CouponCheckRequest<'_>,
    ) -> Result<CouponCheckResponse, ApiError> {
        self.post("coupons/check", request).await
    }

    /// Look up a gift card by its number.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, number))]
    pub async fn gift_card(&self, number: &str) -> Result<GiftCardLookupResponse, ApiError> {
        self.get(&format!("gift-cards/{number}")).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, ApiError> {
        self.post("orders", request).await
    }

    // =========================================================================
    // Settings & Theme Methods
    // =========================================================================

    /// Get store settings. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn store_settings(&self) -> Result<StoreSettings, ApiError> {
        let cache_key = "settings".to_string();

        if let Some(CacheValue::Settings(settings)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for settings");
            return Ok(*settings);
        }

        let settings: StoreSettings = self.get("settings").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Settings(Box::new(settings.clone())))
            .await;

        Ok(settings)
    }

    /// Get raw theme settings. Not cached; the customizer needs fresh state.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn theme_settings(&self) -> Result<serde_json::Value, ApiError> {
        self.get("theme-settings").await
    }

    /// Persist theme settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn save_theme_settings(&self, settings: &serde_json::Value) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put("theme-settings", settings).await?;
        Ok(())
    }

    // =========================================================================
    // Customer Methods
    // =========================================================================

    /// Get the signed-in customer's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no session token is attached or the request fails.
    #[instrument(skip(self))]
    pub async fn customer_profile(&self) -> Result<Customer, ApiError> {
        self.get("customer").await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, slug: &str) {
        self.inner
            .cache
            .invalidate(&format!("product:{slug}"))
            .await;
    }

    /// Invalidate cached store settings.
    pub async fn invalidate_settings(&self) {
        self.inner.cache.invalidate("settings").await;
    }

    // =========================================================================
    // Media URLs
    // =========================================================================

    fn resolve_product_media(&self, product: &mut Product) {
        for media in &mut product.media {
            media.url = self.resolve_media_url(&media.url);
        }
    }

    fn resolve_category_media(&self, category: &mut Category) {
        if let Some(url) = category.image_url.take() {
            category.image_url = Some(self.resolve_media_url(&url));
        }
        for child in &mut category.children {
            self.resolve_category_media(child);
        }
    }

    /// Resolve a possibly-relative media path against the media base URL.
    fn resolve_media_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        self.inner
            .media_base
            .join(url.trim_start_matches('/'))
            .map_or_else(|_| url.to_string(), |resolved| resolved.to_string())
    }
}

// =============================================================================
// ProductQuery
// =============================================================================

/// Query parameters for the product listing and facet endpoints.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Restrict to these product IDs.
    pub ids: Vec<ProductId>,
    /// 1-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Top-level category slug.
    pub category: Option<String>,
    /// Second-level category slug.
    pub sub_category: Option<String>,
    /// Third-level category slug.
    pub sub_sub_category: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
    /// Lower price bound.
    pub min_price: Option<Decimal>,
    /// Upper price bound.
    pub max_price: Option<Decimal>,
    /// Restrict to these brands.
    pub brands: Vec<BrandId>,
    /// Selected variation facets as (option label, value) pairs.
    pub variations: Vec<(String, String)>,
    /// Sort order.
    pub sort_by: Option<SortKey>,
    /// Restrict to products in an offer.
    pub offer: Option<String>,
    /// Restrict to products in a home page section.
    pub section: Option<String>,
}

impl ProductQuery {
    /// Encode as query-string pairs using the listing API's parameter names.
    /// Unset fields are omitted.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if !self.ids.is_empty() {
            let joined = self
                .ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("ids".to_string(), joined));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category_slug".to_string(), category.clone()));
        }
        if let Some(sub_category) = &self.sub_category {
            pairs.push(("sub_category_slug".to_string(), sub_category.clone()));
        }
        if let Some(sub_sub_category) = &self.sub_sub_category {
            pairs.push(("sub_sub_category_slug".to_string(), sub_sub_category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search_term".to_string(), search.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price".to_string(), max_price.to_string()));
        }
        if !self.brands.is_empty() {
            let joined = self
                .brands
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("filter_brand".to_string(), joined));
        }
        // Facet values are globally unique; the option label stays client-side.
        for (_, value) in &self.variations {
            pairs.push(("variations[]".to_string(), value.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by".to_string(), sort_by.as_param().to_string()));
        }
        if let Some(offer) = &self.offer {
            pairs.push(("offer_slug".to_string(), offer.clone()));
        }
        if let Some(section) = &self.section {
            pairs.push(("section_slug".to_string(), section.clone()));
        }

        pairs
    }
}

// =============================================================================
// Tests
// =============================================================================
