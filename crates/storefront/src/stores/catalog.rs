//! Catalog store: category tree, brands, offers and branches.

use chrono::{DateTime, Utc};
use tracing::warn;
use velvet_tamarind_core::{BranchId, BrandId, CategoryId};

use crate::api::{ApiClient, ApiError};
use crate::types::{Branch, Brand, Category, Offer};

/// Shared catalog reference data, loaded once per session.
#[derive(Debug, Default)]
pub struct CatalogStore {
    categories: Vec<Category>,
    brands: Vec<Brand>,
    offers: Vec<Offer>,
    branches: Vec<Branch>,
    selected_branch_id: Option<BranchId>,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the category tree directly.
    #[cfg(test)]
    pub(crate) fn seed_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// The category tree, top level first.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    /// All offers, including scheduled and expired ones.
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Load the category tree. Navigation cannot render without it, so a
    /// failure propagates.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn load_categories(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.categories = api.categories().await?;
        Ok(())
    }

    /// Load brands. Failures are logged; the previous list stays.
    pub async fn load_brands(&mut self, api: &ApiClient) {
        match api.brands().await {
            Ok(brands) => self.brands = brands,
            Err(error) => warn!(%error, "Failed to load brands"),
        }
    }

    /// Load offers. Failures are logged; the previous list stays.
    pub async fn load_offers(&mut self, api: &ApiClient) {
        match api.offers().await {
            Ok(offers) => self.offers = offers,
            Err(error) => warn!(%error, "Failed to load offers"),
        }
    }

    /// Load store branches. Failures are logged; the previous list stays.
    pub async fn load_branches(&mut self, api: &ApiClient) {
        match api.branches().await {
            Ok(branches) => self.branches = branches,
            Err(error) => warn!(%error, "Failed to load branches"),
        }
    }

    /// Walk the category tree along a slug path.
    ///
    /// Returns the category at the deepest requested level, or `None` when
    /// any step of the path does not resolve.
    #[must_use]
    pub fn category_by_slug(
        &self,
        slug: &str,
        sub: Option<&str>,
        sub_sub: Option<&str>,
    ) -> Option<&Category> {
        let category = self.categories.iter().find(|c| c.slug == slug)?;
        match (sub, sub_sub) {
            (None, None) => Some(category),
            // A third level without a second cannot resolve
            (None, Some(_)) => None,
            (Some(sub), rest) => {
                let sub_category = category.children.iter().find(|c| c.slug == sub)?;
                match rest {
                    None => Some(sub_category),
                    Some(sub_sub) => sub_category.children.iter().find(|c| c.slug == sub_sub),
                }
            }
        }
    }

    /// Find a top-level category by ID.
    #[must_use]
    pub fn category_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn brand_by_id(&self, id: BrandId) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn offer_by_slug(&self, slug: &str) -> Option<&Offer> {
        self.offers.iter().find(|o| o.slug == slug)
    }

    /// Offers running at `now`.
    #[must_use]
    pub fn active_offers(&self, now: DateTime<Utc>) -> Vec<&Offer> {
        self.offers.iter().filter(|o| o.is_active(now)).collect()
    }

    /// Select a branch for the session (e.g. for store pickup).
    pub fn select_branch(&mut self, id: BranchId) {
        self.selected_branch_id = Some(id);
    }

    /// The selected branch, when it exists in the loaded list.
    #[must_use]
    pub fn selected_branch(&self) -> Option<&Branch> {
        let id = self.selected_branch_id?;
        self.branches.iter().find(|b| b.id == id)
    }
}
