//! Product comparison store.

use velvet_tamarind_core::ProductId;

use crate::types::{Product, ProductAttribute};

/// At most this many products compare side by side.
const MAX_COMPARED: usize = 3;

/// Products under comparison, newest first, capped at [`MAX_COMPARED`].
#[derive(Debug, Default)]
pub struct CompareStore {
    products: Vec<Product>,
}

impl CompareStore {
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

    /// Add a product to the front. No-op when already compared; at capacity
    /// the oldest entry drops off the back.
    pub fn add(&mut self, product: Product) {
        if self.contains(product.id) {
            return;
        }
        if self.products.len() >= MAX_COMPARED {
            self.products.pop();
        }
        self.products.insert(0, product);
    }

    /// Remove a product. No-op when absent.
    pub fn remove(&mut self, id: ProductId) {
        self.products.retain(|p| p.id != id);
    }

    /// The union of attribute rows across compared products, de-duplicated
    /// by attribute name. The first product to define a name wins.
    #[must_use]
    pub fn attributes(&self) -> Vec<ProductAttribute> {
        let mut rows: Vec<ProductAttribute> = Vec::new();
        for product in &self.products {
            for attribute in &product.attributes {
                if !rows
                    .iter()
                    .any(|row| row.attribute_name == attribute.attribute_name)
                {
                    rows.push(attribute.clone());
                }
            }
        }
        rows
    }

    /// A product's value for an attribute name, for the comparison grid.
    #[must_use]
    pub fn attribute_value(&self, id: ProductId, name: &str) -> Option<&str> {
        let product = self.products.iter().find(|p| p.id == id)?;
        product
            .attributes
            .iter()
            .find(|a| a.attribute_name == name)
            .map(|a| a.value.as_str())
    }
}
