//! Product listing store: filters, sort, pagination and fetched pages.

use rust_decimal::Decimal;
use tracing::instrument;
use velvet_tamarind_core::BrandId;

use crate::api::{ApiClient, ApiError, ProductQuery};
use crate::types::{Facets, PaginationMode, Product, SortKey};

const DEFAULT_PER_PAGE: u32 = 20;

/// One product listing (a category page, search results, an offer page or a
/// home section) with its filter, sort and pagination state.
///
/// The listing context (category path, offer or section) is exclusive;
/// setting one clears the others. Filter toggles jump back to the first page
/// and refetch.
#[derive(Debug)]
pub struct ProductListStore {
    products: Vec<Product>,
    facets: Facets,
    page: u32,
    per_page: u32,
    total: u64,
    total_pages: u32,
    mode: PaginationMode,
    sort_by: Option<SortKey>,
    search: Option<String>,
    price_range: Option<(Decimal, Decimal)>,
    brand_filter: Vec<BrandId>,
    variation_filter: Vec<(String, String)>,
    category: Option<String>,
    sub_category: Option<String>,
    sub_sub_category: Option<String>,
    offer: Option<String>,
    section: Option<String>,
}

impl Default for ProductListStore {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            facets: Facets::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
            total_pages: 0,
            mode: PaginationMode::default(),
            sort_by: None,
            search: None,
            price_range: None,
            brand_filter: Vec::new(),
            variation_filter: Vec::new(),
            category: None,
            sub_category: None,
            sub_sub_category: None,
            offer: None,
            section: None,
        }
    }
}

impl ProductListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Products loaded for the current listing.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Filter facets for the current listing context.
    #[must_use]
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total products matching the query, from the last fetch.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    #[must_use]
    pub fn sort(&self) -> Option<SortKey> {
        self.sort_by
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn price_range(&self) -> Option<(Decimal, Decimal)> {
        self.price_range
    }

    #[must_use]
    pub fn selected_brands(&self) -> &[BrandId] {
        &self.brand_filter
    }

    /// Selected variation facets as (option label, value) pairs.
    #[must_use]
    pub fn selected_variations(&self) -> &[(String, String)] {
        &self.variation_filter
    }

    #[must_use]
    pub fn is_brand_selected(&self, brand: BrandId) -> bool {
        self.brand_filter.contains(&brand)
    }

    #[must_use]
    pub fn is_variation_selected(&self, name: &str, value: &str) -> bool {
        self.variation_filter
            .iter()
            .any(|(n, v)| n == name && v == value)
    }

    // =========================================================================
    // Listing Context
    // =========================================================================

    /// Switch pagination mode. Takes effect on the next fetch.
    pub fn set_mode(&mut self, mode: PaginationMode) {
        self.mode = mode;
    }

    /// Point the listing at a category path. Clears any offer or section
    /// context and jumps back to the first page.
    pub fn set_category_path(
        &mut self,
        category: Option<String>,
        sub_category: Option<String>,
        sub_sub_category: Option<String>,
    ) {
        self.category = category;
        self.sub_category = sub_category;
        self.sub_sub_category = sub_sub_category;
        self.offer = None;
        self.section = None;
        self.page = 1;
    }

    /// Point the listing at an offer. Clears any category or section context.
    pub fn set_offer(&mut self, offer: Option<String>) {
        self.offer = offer;
        self.category = None;
        self.sub_category = None;
        self.sub_sub_category = None;
        self.section = None;
        self.page = 1;
    }

    /// Point the listing at a home section. Clears any category or offer
    /// context.
    pub fn set_section(&mut self, section: Option<String>) {
        self.section = section;
        self.category = None;
        self.sub_category = None;
        self.sub_sub_category = None;
        self.offer = None;
        self.page = 1;
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the current page.
    ///
    /// In [`PaginationMode::Infinite`] pages past the first append to the
    /// list; the first page always replaces it, so filter changes start a
    /// fresh list in either mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. The loaded list stays.
    #[instrument(skip_all, fields(page = self.page))]
    pub async fn fetch(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let page = api.products(&self.query()).await?;

        if self.mode == PaginationMode::Infinite && self.page > 1 {
            self.products.extend(page.data);
        } else {
            self.products = page.data;
        }
        self.total = page.total;
        self.total_pages = page.last_page;
        Ok(())
    }

    /// Fetch filter facets for the current listing context.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn fetch_facets(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.facets = api.facets(&self.facet_query()).await?;
        Ok(())
    }

    /// Jump to a page and fetch it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn set_page(&mut self, api: &ApiClient, page: u32) -> Result<(), ApiError> {
        self.page = page.max(1);
        self.fetch(api).await
    }

    /// Advance one page and fetch it. The infinite-scroll companion.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn next_page(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.page += 1;
        self.fetch(api).await
    }

    /// Change the page size and refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn set_per_page(&mut self, api: &ApiClient, per_page: u32) -> Result<(), ApiError> {
        self.per_page = per_page;
        self.page = 1;
        self.fetch(api).await
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Toggle a brand in the brand filter and refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn toggle_brand(&mut self, api: &ApiClient, brand: BrandId) -> Result<(), ApiError> {
        match self.brand_filter.iter().position(|id| *id == brand) {
            Some(index) => {
                self.brand_filter.remove(index);
            }
            None => self.brand_filter.push(brand),
        }
        self.page = 1;
        self.fetch(api).await
    }

    /// Toggle a variation facet value and refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn toggle_variation(
        &mut self,
        api: &ApiClient,
        name: &str,
        value: &str,
    ) -> Result<(), ApiError> {
        match self
            .variation_filter
            .iter()
            .position(|(n, v)| n == name && v == value)
        {
            Some(index) => {
                self.variation_filter.remove(index);
            }
            None => self
                .variation_filter
                .push((name.to_string(), value.to_string())),
        }
        self.page = 1;
        self.fetch(api).await
    }

    /// Remove one value of a variation facet, or every value of the facet
    /// when `value` is `None`, then refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn remove_variation(
        &mut self,
        api: &ApiClient,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), ApiError> {
        match value {
            Some(value) => self
                .variation_filter
                .retain(|(n, v)| !(n == name && v == value)),
            None => self.variation_filter.retain(|(n, _)| n != name),
        }
        self.page = 1;
        self.fetch(api).await
    }

    /// Drop all variation facet selections and refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn clear_variations(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.variation_filter.clear();
        self.page = 1;
        self.fetch(api).await
    }

    /// Set or clear the price range, then refetch the list and the facets
    /// (the range narrows both).
    ///
    /// # Errors
    ///
    /// Returns an error if either API request fails.
    pub async fn set_price_range(
        &mut self,
        api: &ApiClient,
        range: Option<(Decimal, Decimal)>,
    ) -> Result<(), ApiError> {
        self.price_range = range;
        self.page = 1;
        self.fetch(api).await?;
        self.fetch_facets(api).await
    }

    /// Set or clear the search term and refetch from the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn set_search(
        &mut self,
        api: &ApiClient,
        term: Option<String>,
    ) -> Result<(), ApiError> {
        self.search = term;
        self.page = 1;
        self.fetch(api).await
    }

    /// Change the sort order and refetch the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn set_sort(&mut self, api: &ApiClient, sort: SortKey) -> Result<(), ApiError> {
        self.sort_by = Some(sort);
        self.fetch(api).await
    }

    /// Drop every filter (brands, variations, price range, search), then
    /// refetch the list and the facets from the first page. The listing
    /// context and sort order stay.
    ///
    /// # Errors
    ///
    /// Returns an error if either API request fails.
    #[instrument(skip_all)]
    pub async fn reset_filters(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.brand_filter.clear();
        self.variation_filter.clear();
        self.price_range = None;
        self.search = None;
        self.page = 1;
        self.fetch(api).await?;
        self.fetch_facets(api).await
    }

    // =========================================================================
    // Query Assembly
    // =========================================================================

    fn query(&self) -> ProductQuery {
        let (min_price, max_price) = match self.price_range {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        ProductQuery {
            ids: Vec::new(),
            page: Some(self.page),
            per_page: Some(self.per_page),
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            sub_sub_category: self.sub_sub_category.clone(),
            search: self.search.clone(),
            min_price,
            max_price,
            brands: self.brand_filter.clone(),
            variations: self.variation_filter.clone(),
            sort_by: self.sort_by,
            offer: self.offer.clone(),
            section: self.section.clone(),
        }
    }

    /// Facets are scoped by the listing context and price range, never by
    /// the filters themselves (a selected brand must not hide the others).
    fn facet_query(&self) -> ProductQuery {
        let (min_price, max_price) = match self.price_range {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        ProductQuery {
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            sub_sub_category: self.sub_sub_category.clone(),
            search: self.search.clone(),
            min_price,
            max_price,
            offer: self.offer.clone(),
            section: self.section.clone(),
            ..ProductQuery::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn find(pairs: &[(String, String)], key: &str) -> Option<String> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn test_default_query_is_first_page_only() {
        let store = ProductListStore::new();
        let pairs = store.query().to_query_pairs();

        assert_eq!(find(&pairs, "page").as_deref(), Some("1"));
        assert_eq!(find(&pairs, "per_page").as_deref(), Some("20"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_query_reflects_filters() {
        let mut store = ProductListStore::new();
        store.set_category_path(Some("women".to_string()), Some("bags".to_string()), None);
        store.brand_filter = vec![BrandId::new(7), BrandId::new(9)];
        store.variation_filter = vec![("Size".to_string(), "L".to_string())];
        store.price_range = Some((Decimal::from(100), Decimal::from(900)));
        store.search = Some("tote".to_string());
        store.sort_by = Some(SortKey::PriceDesc);

        let pairs = store.query().to_query_pairs();
        assert_eq!(find(&pairs, "category_slug").as_deref(), Some("women"));
        assert_eq!(find(&pairs, "sub_category_slug").as_deref(), Some("bags"));
        assert_eq!(find(&pairs, "search_term").as_deref(), Some("tote"));
        assert_eq!(find(&pairs, "filter_brand").as_deref(), Some("7,9"));
        assert_eq!(find(&pairs, "variations[]").as_deref(), Some("L"));
        assert_eq!(find(&pairs, "min_price").as_deref(), Some("100"));
        assert_eq!(find(&pairs, "max_price").as_deref(), Some("900"));
        assert_eq!(find(&pairs, "sort_by").as_deref(), Some("price_desc"));
    }

    #[test]
    fn test_facet_query_keeps_context_not_filters() {
        let mut store = ProductListStore::new();
        store.set_category_path(Some("women".to_string()), None, None);
        store.brand_filter = vec![BrandId::new(7)];
        store.variation_filter = vec![("Size".to_string(), "L".to_string())];
        store.price_range = Some((Decimal::from(100), Decimal::from(900)));

        let pairs = store.facet_query().to_query_pairs();
        assert_eq!(find(&pairs, "category_slug").as_deref(), Some("women"));
        assert_eq!(find(&pairs, "min_price").as_deref(), Some("100"));
        assert!(find(&pairs, "filter_brand").is_none());
        assert!(find(&pairs, "variations[]").is_none());
        assert!(find(&pairs, "page").is_none());
    }

    #[test]
    fn test_listing_contexts_are_exclusive() {
        let mut store = ProductListStore::new();

        store.set_category_path(Some("women".to_string()), None, None);
        store.set_offer(Some("eid-sale".to_string()));
        assert!(store.category.is_none());
        assert_eq!(store.offer.as_deref(), Some("eid-sale"));

        store.set_section(Some("new-arrivals".to_string()));
        assert!(store.offer.is_none());
        assert_eq!(store.section.as_deref(), Some("new-arrivals"));

        store.set_category_path(Some("men".to_string()), None, None);
        assert!(store.section.is_none());
        assert_eq!(store.category.as_deref(), Some("men"));
    }

    #[test]
    fn test_selection_checks() {
        let mut store = ProductListStore::new();
        store.brand_filter = vec![BrandId::new(7)];
        store.variation_filter = vec![("Color".to_string(), "Red".to_string())];

        assert!(store.is_brand_selected(BrandId::new(7)));
        assert!(!store.is_brand_selected(BrandId::new(8)));
        assert!(store.is_variation_selected("Color", "Red"));
        assert!(!store.is_variation_selected("Color", "Blue"));
        assert!(!store.is_variation_selected("Size", "Red"));
    }
}
