//! Product view store: one product under detail or quick view, its option
//! selection and the add-to-cart flow.

use std::collections::HashMap;

use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::error::CartError;
use crate::types::{CartItem, Product, ProductKind, Variation, VariationAxis};

use super::cart::CartStore;

/// Whether an add-to-cart came from the add button or the buy-now button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Add the line and stay on the page.
    Add,
    /// Add the line and head to checkout.
    Buy,
}

/// What the caller should do after a successful add-to-cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddedToCart {
    /// Line added; stay where you are.
    Added,
    /// Line added; proceed to checkout.
    ProceedToCheckout,
}

/// A product being viewed, with its option selection and quantity.
///
/// The session keeps two instances: one for the product detail page and one
/// for the quick-view overlay.
#[derive(Debug)]
pub struct ProductViewStore {
    product: Option<Product>,
    selection: HashMap<String, String>,
    quantity: i64,
}

impl Default for ProductViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductViewStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            product: None,
            selection: HashMap::new(),
            quantity: 1,
        }
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    #[must_use]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Load a product by slug, resetting the selection and quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self, api))]
    pub async fn load(&mut self, api: &ApiClient, slug: &str) -> Result<(), ApiError> {
        let product = api.product_by_slug(slug).await?;
        self.product = Some(product);
        self.selection.clear();
        self.quantity = 1;
        Ok(())
    }

    /// Drop the viewed product and reset the selection.
    pub fn clear(&mut self) {
        self.product = None;
        self.selection.clear();
        self.quantity = 1;
    }

    /// Set the purchase quantity, floored at one unit.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.max(1);
    }

    /// Pick a value for one option (e.g. "Size" -> "L"). Re-picking the
    /// option replaces the value.
    pub fn select_option(&mut self, name: &str, value: &str) {
        self.selection.insert(name.to_string(), value.to_string());
    }

    #[must_use]
    pub fn is_option_selected(&self, name: &str, value: &str) -> bool {
        self.selection.get(name).is_some_and(|v| v == value)
    }

    /// Whether the selection covers every option of the template. Single
    /// products need no selection; with no product loaded this is `false`.
    #[must_use]
    pub fn required_options_selected(&self) -> bool {
        let Some(product) = &self.product else {
            return false;
        };
        if product.kind == ProductKind::Single {
            return true;
        }
        let labels = product.option_labels();
        !labels.is_empty()
            && labels
                .iter()
                .all(|label| self.selection.contains_key(*label))
    }

    /// Resolve the variation matching the selection, value by value in
    /// template order. Single products resolve to their only variation.
    #[must_use]
    pub fn selected_variation(&self) -> Option<&Variation> {
        let product = self.product.as_ref()?;
        if product.kind == ProductKind::Single {
            return product.default_variation();
        }
        if !self.required_options_selected() {
            return None;
        }

        let labels = product.option_labels();
        product.variations.iter().find(|variation| {
            let values: Vec<&str> = variation.option_values().collect();
            values.len() == labels.len()
                && labels
                    .iter()
                    .zip(&values)
                    .all(|(label, value)| self.selection.get(*label).is_some_and(|s| s == value))
        })
    }

    /// The option template as axes with every value seen across variations,
    /// in first-seen order. Drives the option pickers.
    #[must_use]
    pub fn variation_axes(&self) -> Vec<VariationAxis> {
        let Some(product) = &self.product else {
            return Vec::new();
        };

        product
            .option_labels()
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let mut values: Vec<String> = Vec::new();
                for variation in &product.variations {
                    if let Some(value) = variation.option_values().nth(index)
                        && !values.iter().any(|v| v == value)
                    {
                        values.push(value.to_string());
                    }
                }
                VariationAxis {
                    name: (*label).to_string(),
                    values,
                }
            })
            .collect()
    }

    /// Whether the currently resolved variation is already in the cart.
    #[must_use]
    pub fn in_cart(&self, cart: &CartStore) -> bool {
        self.selected_variation()
            .is_some_and(|variation| cart.contains(variation.id))
    }

    /// Add the resolved variation to the cart at the chosen quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::VariationNotSelected`] when no variation
    /// resolves from the selection, or the cart's own errors (stock, API).
    #[instrument(skip_all, fields(mode = ?mode))]
    pub async fn add_to_cart(
        &self,
        api: &ApiClient,
        cart: &mut CartStore,
        mode: AddMode,
    ) -> Result<AddedToCart, CartError> {
        let product_id = self
            .product
            .as_ref()
            .ok_or(CartError::VariationNotSelected)?
            .id;
        let variation_id = self
            .selected_variation()
            .ok_or(CartError::VariationNotSelected)?
            .id;

        cart.add(api, CartItem::new(product_id, variation_id, self.quantity))
            .await?;

        Ok(match mode {
            AddMode::Add => AddedToCart::Added,
            AddMode::Buy => AddedToCart::ProceedToCheckout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use url::Url;

    use super::*;
    use crate::config::StorefrontConfig;

    fn variation(id: i64, name: &str) -> Variation {
        Variation {
            id: id.into(),
            name: name.to_string(),
            price: Decimal::from(900),
            sale_price: None,
            quantity_available: 5,
            weight: Decimal::from(400),
            sku: None,
        }
    }

    fn variable_product() -> Product {
        Product {
            id: 1.into(),
            name: "Canvas Tote".to_string(),
            slug: "canvas-tote".to_string(),
            kind: ProductKind::Variable,
            option_template: Some("Size|Color".to_string()),
            price: Decimal::from(900),
            sale_price: None,
            media: vec![],
            variations: vec![
                variation(11, "L|Red"),
                variation(12, "L|Blue"),
                variation(13, "M|Red"),
            ],
            attributes: vec![],
            brand_id: None,
            description: None,
        }
    }

    fn view_with(product: Product) -> ProductViewStore {
        let mut view = ProductViewStore::new();
        view.product = Some(product);
        view
    }

    #[test]
    fn test_required_options_track_selection() {
        let mut view = view_with(variable_product());
        assert!(!view.required_options_selected());

        view.select_option("Size", "L");
        assert!(!view.required_options_selected());

        view.select_option("Color", "Red");
        assert!(view.required_options_selected());
    }

    #[test]
    fn test_single_product_needs_no_selection() {
        let mut product = variable_product();
        product.kind = ProductKind::Single;
        let view = view_with(product);

        assert!(view.required_options_selected());
        assert_eq!(view.selected_variation().unwrap().id.as_i64(), 11);
    }

    #[test]
    fn test_selected_variation_matches_in_template_order() {
        let mut view = view_with(variable_product());
        view.select_option("Color", "Red");
        view.select_option("Size", "M");

        assert_eq!(view.selected_variation().unwrap().id.as_i64(), 13);

        // Replacing an option re-resolves
        view.select_option("Size", "L");
        assert_eq!(view.selected_variation().unwrap().id.as_i64(), 11);
    }

    #[test]
    fn test_missing_combination_resolves_to_none() {
        let mut view = view_with(variable_product());
        view.select_option("Size", "M");
        view.select_option("Color", "Blue");

        assert!(view.selected_variation().is_none());
    }

    #[test]
    fn test_variation_axes_in_first_seen_order() {
        let view = view_with(variable_product());
        let axes = view.variation_axes();

        assert_eq!(axes.len(), 2);
        let size = axes.first().unwrap();
        assert_eq!(size.name, "Size");
        assert_eq!(size.values, vec!["L", "M"]);
        let color = axes.get(1).unwrap();
        assert_eq!(color.name, "Color");
        assert_eq!(color.values, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_quantity_floors_at_one() {
        let mut view = ProductViewStore::new();
        view.set_quantity(4);
        assert_eq!(view.quantity(), 4);
        view.set_quantity(0);
        assert_eq!(view.quantity(), 1);
        view.set_quantity(-2);
        assert_eq!(view.quantity(), 1);
    }

    #[test]
    fn test_in_cart_follows_resolved_variation() {
        let mut cart = CartStore::new();
        cart.restore(vec![CartItem::new(1.into(), 11.into(), 1)]);

        let mut view = view_with(variable_product());
        assert!(!view.in_cart(&cart));

        view.select_option("Size", "L");
        view.select_option("Color", "Red");
        assert!(view.in_cart(&cart));

        view.select_option("Color", "Blue");
        assert!(!view.in_cart(&cart));
    }

    #[tokio::test]
    async fn test_add_to_cart_requires_resolved_variation() {
        let config = StorefrontConfig::new(Url::parse("http://localhost:9999/api/v1").unwrap());
        let api = ApiClient::new(&config).unwrap();
        let mut cart = CartStore::new();

        let mut view = view_with(variable_product());
        view.select_option("Size", "L");

        let err = view
            .add_to_cart(&api, &mut cart, AddMode::Add)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::VariationNotSelected));
        assert_eq!(cart.total_count(), 0);
    }
}
