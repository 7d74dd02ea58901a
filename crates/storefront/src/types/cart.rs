//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{ProductId, VariationId};

use super::product::ProductKind;

/// A cart line as stored in session state and sent on order payloads.
///
/// Lines are unique per `variation_id` within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product the line belongs to.
    pub product_id: ProductId,
    /// Purchased variation.
    pub variation_id: VariationId,
    /// Units of this variation.
    pub quantity: i64,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub const fn new(product_id: ProductId, variation_id: VariationId, quantity: i64) -> Self {
        Self {
            product_id,
            variation_id,
            quantity,
        }
    }
}

/// A cart line joined with its cached product and variation data.
///
/// Produced by [`crate::stores::CartStore::detailed_items`]; lines whose
/// product or variation is no longer in the cache are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemDetail {
    /// Product the line belongs to.
    pub product_id: ProductId,
    /// Purchased variation.
    pub variation_id: VariationId,
    /// Product display name.
    pub name: String,
    /// Product URL slug.
    pub slug: String,
    /// Single or variable.
    pub kind: ProductKind,
    /// Primary product image, when the product has media.
    pub image_url: Option<String>,
    /// Variation display label ("Size: L, Color: Red") for variable products.
    pub options_label: Option<String>,
    /// Effective unit price (sale price when active).
    pub unit_price: Decimal,
    /// Units of this variation.
    pub quantity: i64,
    /// Shipping weight per unit in grams.
    pub weight: Decimal,
    /// Units currently in stock.
    pub quantity_available: i64,
    /// Whether the variation has stock left.
    pub in_stock: bool,
}

impl CartItemDetail {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Line shipping weight: unit weight times quantity.
    #[must_use]
    pub fn shipping_weight(&self) -> Decimal {
        self.weight * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal_and_weight() {
        let detail = CartItemDetail {
            product_id: 1.into(),
            variation_id: 2.into(),
            name: "Tote".to_string(),
            slug: "tote".to_string(),
            kind: ProductKind::Single,
            image_url: None,
            options_label: None,
            unit_price: Decimal::new(4950, 2),
            quantity: 3,
            weight: Decimal::from(500),
            quantity_available: 9,
            in_stock: true,
        };

        assert_eq!(detail.subtotal(), Decimal::new(14850, 2));
        assert_eq!(detail.shipping_weight(), Decimal::from(1500));
    }
}
