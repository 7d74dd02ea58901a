//! Wishlist store.

use velvet_tamarind_core::ProductId;

use crate::types::Product;

/// Products the customer saved for later, newest first.
#[derive(Debug, Default)]
pub struct WishlistStore {
    products: Vec<Product>,
}

impl WishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// Add a product to the front of the list. No-op when already saved.
    pub fn add(&mut self, product: Product) {
        if self.contains(product.id) {
            return;
        }
        self.products.insert(0, product);
    }

    /// Remove a product. No-op when absent.
    pub fn remove(&mut self, id: ProductId) {
        self.products.retain(|p| p.id != id);
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductKind;

    fn product(id: i64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            kind: ProductKind::Single,
            option_template: None,
            price: Decimal::from(100),
            sale_price: None,
            media: vec![],
            variations: vec![],
            attributes: vec![],
            brand_id: None,
            description: None,
        }
    }

    #[test]
    fn test_add_prepends_and_ignores_duplicates() {
        let mut wishlist = WishlistStore::new();
        wishlist.add(product(1));
        wishlist.add(product(2));
        wishlist.add(product(1));

        assert_eq!(wishlist.count(), 2);
        let ids: Vec<i64> = wishlist
            .products()
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut wishlist = WishlistStore::new();
        wishlist.add(product(1));

        wishlist.remove(9.into());
        assert_eq!(wishlist.count(), 1);

        wishlist.remove(1.into());
        assert_eq!(wishlist.count(), 0);
        assert!(!wishlist.contains(1.into()));
    }
}
