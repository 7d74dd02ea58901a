//! Cart store: session cart lines and their derived views.

use rust_decimal::Decimal;
use tracing::{instrument, warn};
use velvet_tamarind_core::{ProductId, VariationId};

use crate::api::ApiClient;
use crate::error::CartError;
use crate::types::{CartItem, CartItemDetail, Product};

/// The session cart.
///
/// Lines are unique per variation and kept newest-first. Product details for
/// the lines are cached alongside so the derived views (line details, totals,
/// shipping weight) need no further fetches.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    products: Vec<Product>,
    loaded: bool,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart with lines and cached products already in place.
    #[cfg(test)]
    pub(crate) fn with_products(items: Vec<CartItem>, products: Vec<Product>) -> Self {
        Self {
            items,
            products,
            loaded: true,
        }
    }

    /// Current cart lines, newest first.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cached product details for the lines.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether product details have been fetched at least once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of cart lines (not units).
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    /// Whether a variation is already in the cart.
    #[must_use]
    pub fn contains(&self, variation_id: VariationId) -> bool {
        self.items
            .iter()
            .any(|line| line.variation_id == variation_id)
    }

    /// Add a line after checking live stock.
    ///
    /// An existing line for the same variation takes the new quantity;
    /// otherwise the line goes to the front. A failed stock check is logged
    /// and the line is added anyway.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when the backend tracks stock for
    /// the variation and the requested quantity exceeds it.
    #[instrument(skip(self, api), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub async fn add(&mut self, api: &ApiClient, item: CartItem) -> Result<(), CartError> {
        match api.product_stock(item.product_id, item.variation_id).await {
            // Zero means the backend does not track stock for this variation.
            Ok(available) if available > 0 && available < item.quantity => {
                return Err(CartError::OutOfStock {
                    requested: item.quantity,
                    available,
                });
            }
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "Stock check failed, adding to cart anyway");
            }
        }

        self.upsert(item);
        self.fetch_products(api).await;
        Ok(())
    }

    fn upsert(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|line| line.variation_id == item.variation_id)
        {
            Some(line) => *line = item,
            None => self.items.insert(0, item),
        }
    }

    /// Remove the line for a variation. No-op when absent.
    pub fn remove(&mut self, variation_id: VariationId) {
        self.items.retain(|line| line.variation_id != variation_id);
    }

    /// Set the quantity of an existing line. No-op when absent.
    pub fn update_quantity(&mut self, variation_id: VariationId, quantity: i64) {
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.variation_id == variation_id)
        {
            line.quantity = quantity;
        }
    }

    /// Drop all lines. Cached product details stay; they are harmless and the
    /// next fetch replaces them.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Seed lines without refreshing product details, e.g. restored from a
    /// mirror the caller keeps. Duplicate variations collapse, last one wins.
    pub fn restore(&mut self, items: Vec<CartItem>) {
        self.items.clear();
        for item in items {
            self.upsert(item);
        }
    }

    /// Replace the cart wholesale and refresh product details.
    pub async fn set_items(&mut self, api: &ApiClient, items: Vec<CartItem>) {
        self.restore(items);
        self.fetch_products(api).await;
    }

    /// Merge the server-side cart into the local one.
    ///
    /// Server lines come first; a variation held both locally and on the
    /// server keeps the sum of both quantities.
    ///
    /// # Errors
    ///
    /// Returns an error when the server cart cannot be fetched. The local
    /// lines are left untouched in that case.
    #[instrument(skip_all)]
    pub async fn sync(&mut self, api: &ApiClient) -> Result<(), CartError> {
        let server_items = api.cart_items().await?;
        self.items = merge_lines(server_items, std::mem::take(&mut self.items));
        self.fetch_products(api).await;
        Ok(())
    }

    /// Refresh cached product details for the lines in the cart.
    ///
    /// Lines whose product no longer comes back (hidden or removed upstream)
    /// are dropped. A failed fetch is logged and keeps the previous cache.
    pub async fn fetch_products(&mut self, api: &ApiClient) {
        let mut ids: Vec<ProductId> = Vec::new();
        for line in &self.items {
            if !ids.contains(&line.product_id) {
                ids.push(line.product_id);
            }
        }

        match api.products_by_ids(&ids).await {
            Ok(products) => {
                self.items
                    .retain(|line| products.iter().any(|p| p.id == line.product_id));
                self.products = products;
                self.loaded = true;
            }
            Err(error) => {
                warn!(%error, "Failed to refresh cart products");
            }
        }
    }

    /// Cart lines joined with their cached product data.
    ///
    /// Lines whose product or variation is not in the cache are omitted.
    #[must_use]
    pub fn detailed_items(&self) -> Vec<CartItemDetail> {
        self.items
            .iter()
            .filter_map(|line| {
                let product = self.products.iter().find(|p| p.id == line.product_id)?;
                let variation = product.variation(line.variation_id)?;
                Some(CartItemDetail {
                    product_id: product.id,
                    variation_id: line.variation_id,
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    kind: product.kind,
                    image_url: product.primary_image_url().map(ToString::to_string),
                    options_label: product.option_display(variation),
                    unit_price: variation.effective_price(),
                    quantity: line.quantity,
                    weight: variation.weight,
                    quantity_available: variation.quantity_available,
                    in_stock: variation.is_in_stock(),
                })
            })
            .collect()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.detailed_items()
            .iter()
            .map(CartItemDetail::subtotal)
            .sum()
    }

    /// Sum of line shipping weights in grams.
    #[must_use]
    pub fn total_shipping_weight(&self) -> Decimal {
        self.detailed_items()
            .iter()
            .map(CartItemDetail::shipping_weight)
            .sum()
    }
}

/// Merge two sets of lines, `server` first, summing quantities for
/// variations present in both.
fn merge_lines(server: Vec<CartItem>, local: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::new();
    for item in server.into_iter().chain(local) {
        match merged
            .iter_mut()
            .find(|line| line.variation_id == item.variation_id)
        {
            Some(line) => line.quantity += item.quantity,
            None => merged.push(item),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ProductKind, Variation};

    fn variation(id: i64, name: &str, price: i64, weight: i64, available: i64) -> Variation {
        Variation {
            id: id.into(),
            name: name.to_string(),
            price: Decimal::from(price),
            sale_price: None,
            quantity_available: available,
            weight: Decimal::from(weight),
            sku: None,
        }
    }

    fn single_product(id: i64, variation_id: i64, price: i64, weight: i64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            kind: ProductKind::Single,
            option_template: None,
            price: Decimal::from(price),
            sale_price: None,
            media: vec![],
            variations: vec![variation(variation_id, "Default", price, weight, 10)],
            attributes: vec![],
            brand_id: None,
            description: None,
        }
    }

    #[test]
    fn test_upsert_replaces_quantity_for_existing_variation() {
        let mut cart = CartStore::new();
        cart.upsert(CartItem::new(1.into(), 11.into(), 2));
        cart.upsert(CartItem::new(1.into(), 11.into(), 5));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 5);
    }

    #[test]
    fn test_upsert_prepends_new_lines() {
        let mut cart = CartStore::new();
        cart.upsert(CartItem::new(1.into(), 11.into(), 1));
        cart.upsert(CartItem::new(2.into(), 21.into(), 1));

        let ids: Vec<i64> = cart
            .items()
            .iter()
            .map(|line| line.variation_id.as_i64())
            .collect();
        assert_eq!(ids, vec![21, 11]);
    }

    #[test]
    fn test_merge_lines_sums_shared_variations() {
        let server = vec![CartItem::new(1.into(), 11.into(), 2)];
        let local = vec![
            CartItem::new(1.into(), 11.into(), 3),
            CartItem::new(2.into(), 21.into(), 1),
        ];

        let merged = merge_lines(server, local);

        assert_eq!(merged.len(), 2);
        let first = merged.first().unwrap();
        assert_eq!(first.variation_id.as_i64(), 11);
        assert_eq!(first.quantity, 5);
        let second = merged.get(1).unwrap();
        assert_eq!(second.variation_id.as_i64(), 21);
        assert_eq!(second.quantity, 1);
    }

    #[test]
    fn test_detailed_items_skip_lines_without_cached_product() {
        let mut cart = CartStore::new();
        cart.items = vec![
            CartItem::new(1.into(), 11.into(), 2),
            CartItem::new(9.into(), 91.into(), 1),
        ];
        cart.products = vec![single_product(1, 11, 450, 500)];

        let details = cart.detailed_items();
        assert_eq!(details.len(), 1);
        let detail = details.first().unwrap();
        assert_eq!(detail.product_id.as_i64(), 1);
        assert_eq!(detail.subtotal(), Decimal::from(900));
    }

    #[test]
    fn test_totals_sum_over_lines() {
        let mut cart = CartStore::new();
        cart.items = vec![
            CartItem::new(1.into(), 11.into(), 2),
            CartItem::new(2.into(), 21.into(), 1),
        ];
        cart.products = vec![
            single_product(1, 11, 450, 500),
            single_product(2, 21, 300, 800),
        ];

        assert_eq!(cart.total_price(), Decimal::from(1200));
        assert_eq!(cart.total_shipping_weight(), Decimal::from(1800));
    }

    #[test]
    fn test_remove_and_update_quantity() {
        let mut cart = CartStore::new();
        cart.restore(vec![
            CartItem::new(1.into(), 11.into(), 2),
            CartItem::new(2.into(), 21.into(), 1),
        ]);

        cart.update_quantity(21.into(), 4);
        let line = cart
            .items()
            .iter()
            .find(|line| line.variation_id.as_i64() == 21)
            .unwrap();
        assert_eq!(line.quantity, 4);

        cart.remove(11.into());
        assert_eq!(cart.total_count(), 1);
        assert!(!cart.contains(11.into()));
        assert!(cart.contains(21.into()));

        // Unknown variations are no-ops
        cart.remove(99.into());
        cart.update_quantity(99.into(), 7);
        assert_eq!(cart.total_count(), 1);
    }

    #[test]
    fn test_restore_collapses_duplicate_variations() {
        let mut cart = CartStore::new();
        cart.restore(vec![
            CartItem::new(1.into(), 11.into(), 1),
            CartItem::new(1.into(), 11.into(), 3),
        ]);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 3);
    }
}
