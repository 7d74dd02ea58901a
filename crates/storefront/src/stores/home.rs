//! Home store: home page content and product selections.

use tracing::warn;

use crate::api::ApiClient;
use crate::types::{FeaturedCategory, HomeContent, HomeSection, Product, Slider};

use super::catalog::CatalogStore;

/// Home page state. Everything here is decoration; all loads are
/// best-effort and a failure leaves the previous state.
#[derive(Debug, Default)]
pub struct HomeStore {
    content: Option<HomeContent>,
    trending: Vec<Product>,
    latest: Vec<Product>,
    loaded: bool,
}

impl HomeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether home content has loaded at least once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn content(&self) -> Option<&HomeContent> {
        self.content.as_ref()
    }

    /// Product sections configured for the home page.
    #[must_use]
    pub fn sections(&self) -> &[HomeSection] {
        self.content.as_ref().map_or(&[], |c| &c.sections)
    }

    /// Hero sliders configured for the home page.
    #[must_use]
    pub fn sliders(&self) -> &[Slider] {
        self.content.as_ref().map_or(&[], |c| &c.sliders)
    }

    #[must_use]
    pub fn trending_products(&self) -> &[Product] {
        &self.trending
    }

    #[must_use]
    pub fn latest_products(&self) -> &[Product] {
        &self.latest
    }

    /// Load home page content.
    pub async fn load(&mut self, api: &ApiClient) {
        match api.home_content().await {
            Ok(content) => {
                self.content = Some(content);
                self.loaded = true;
            }
            Err(error) => warn!(%error, "Failed to load home content"),
        }
    }

    /// Load the trending product selection.
    pub async fn load_trending(&mut self, api: &ApiClient) {
        match api.trending_products().await {
            Ok(products) => self.trending = products,
            Err(error) => warn!(%error, "Failed to load trending products"),
        }
    }

    /// Load the latest product selection.
    pub async fn load_latest(&mut self, api: &ApiClient) {
        match api.latest_products().await {
            Ok(products) => self.latest = products,
            Err(error) => warn!(%error, "Failed to load latest products"),
        }
    }

    /// Resolve the configured featured-category slug paths against the
    /// category tree. Paths that do not resolve are skipped.
    #[must_use]
    pub fn featured_categories(&self, catalog: &CatalogStore) -> Vec<FeaturedCategory> {
        let Some(content) = &self.content else {
            return Vec::new();
        };

        content
            .featured_categories
            .iter()
            .filter_map(|path| {
                let mut parts = path.split('/');
                let slug = parts.next()?;
                let category =
                    catalog.category_by_slug(slug, parts.next(), parts.next())?;
                Some(FeaturedCategory {
                    name: category.name.clone(),
                    slug: category.slug.clone(),
                    path: path.clone(),
                    image_url: category.image_url.clone(),
                })
            })
            .collect()
    }
}
