//! Product catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{BrandId, MediaId, ProductId, VariationId};

use super::catalog::Brand;

// =============================================================================
// Product Types
// =============================================================================

/// Whether a product has one purchasable form or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// One implicit variation (the first entry in `variations`).
    Single,
    /// Multiple variations selected through the option template.
    Variable,
}

/// Product image or video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    /// Backend media ID.
    pub id: Option<MediaId>,
    /// Asset URL. May arrive relative to the media base URL; the API client
    /// resolves it to an absolute URL at fetch time.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// A purchasable variation of a product.
///
/// For `variable` products the `name` holds one value per template position,
/// `|`-separated in template order (template `"Size|Color"`, name `"L|Red"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    /// Variation ID (cart items and order lines reference this).
    #[serde(rename = "variation_id")]
    pub id: VariationId,
    /// `|`-separated option values, or the product name for single products.
    pub name: String,
    /// Regular unit price.
    pub price: Decimal,
    /// Discounted unit price, when a promotion is running.
    pub sale_price: Option<Decimal>,
    /// Units currently in stock.
    #[serde(rename = "qty_available")]
    pub quantity_available: i64,
    /// Shipping weight in grams.
    #[serde(default)]
    pub weight: Decimal,
    /// Stock keeping unit.
    pub sku: Option<String>,
}

impl Variation {
    /// The price a customer pays: the sale price when one is set below the
    /// regular price, the regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.quantity_available > 0
    }

    /// Option values in template order.
    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.name.split('|').map(str::trim)
    }
}

/// A display attribute used on detail pages and in product comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Attribute label (e.g., "Material").
    pub attribute_name: String,
    /// Attribute value (e.g., "Cotton").
    pub value: String,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Backend product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug, unique per product.
    pub slug: String,
    /// Single or variable.
    #[serde(rename = "type")]
    pub kind: ProductKind,
    /// `|`-separated option labels for variable products (e.g., "Size|Color").
    #[serde(rename = "variation_name")]
    pub option_template: Option<String>,
    /// Regular price of the default variation.
    pub price: Decimal,
    /// Discounted price of the default variation, when on sale.
    pub sale_price: Option<Decimal>,
    /// Product media, first entry is the primary image.
    #[serde(default)]
    pub media: Vec<Media>,
    /// Purchasable variations. Single products carry exactly one.
    #[serde(default)]
    pub variations: Vec<Variation>,
    /// Display attributes.
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    /// Brand, when assigned.
    pub brand_id: Option<BrandId>,
    /// Long-form description (HTML from the backend).
    pub description: Option<String>,
}

impl Product {
    /// The implicit variation of a single product, or the first variation.
    #[must_use]
    pub fn default_variation(&self) -> Option<&Variation> {
        self.variations.first()
    }

    /// Find a variation by ID.
    #[must_use]
    pub fn variation(&self, id: VariationId) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// Option labels in template order ("Size|Color" -> ["Size", "Color"]).
    #[must_use]
    pub fn option_labels(&self) -> Vec<&str> {
        self.option_template
            .as_deref()
            .map(|template| template.split('|').map(str::trim).collect())
            .unwrap_or_default()
    }

    /// Display label for a variation ("Size: L, Color: Red").
    #[must_use]
    pub fn option_display(&self, variation: &Variation) -> Option<String> {
        if self.kind == ProductKind::Single {
            return None;
        }
        let labels = self.option_labels();
        if labels.is_empty() {
            return None;
        }
        let display = labels
            .iter()
            .zip(variation.option_values())
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        Some(display)
    }

    /// The price a customer pays for the default variation.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Primary image URL, when the product has media.
    #[must_use]
    pub fn primary_image_url(&self) -> Option<&str> {
        self.media.first().map(|m| m.url.as_str())
    }
}

/// One axis of the option template with every value seen across variations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariationAxis {
    /// Option label (e.g., "Size").
    pub name: String,
    /// Distinct values in first-seen order (e.g., ["S", "M", "L"]).
    pub values: Vec<String>,
}

// =============================================================================
// List & Filter Types
// =============================================================================

/// One page of a paginated product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub data: Vec<Product>,
    /// Total products matching the query.
    pub total: u64,
    /// Index of the last page.
    pub last_page: u32,
    /// Index of this page (1-based).
    #[serde(default = "default_page")]
    pub current_page: u32,
}

const fn default_page() -> u32 {
    1
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Latest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl SortKey {
    /// Wire value sent as the `sort_by` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

/// How new result pages combine with the ones already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// Each page replaces the list (numbered pagination).
    #[default]
    Normal,
    /// Each page appends to the list (infinite scroll).
    Infinite,
}

/// Available filter facets for the current listing context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facets {
    /// Variation option facets (e.g., Size with its values).
    #[serde(default)]
    pub variations: Vec<FacetGroup>,
    /// Brands present in the listing.
    #[serde(default)]
    pub brands: Vec<Brand>,
}

/// One variation facet: an option label and its selectable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    /// Option label (e.g., "Size").
    pub name: String,
    /// Selectable values.
    pub values: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn variation(id: i64, name: &str, price: Decimal, sale: Option<Decimal>) -> Variation {
        Variation {
            id: id.into(),
            name: name.to_string(),
            price,
            sale_price: sale,
            quantity_available: 10,
            weight: Decimal::from(500),
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
                variation(11, "L|Red", Decimal::from(900), None),
                variation(12, "L|Blue", Decimal::from(950), None),
            ],
            attributes: vec![],
            brand_id: None,
            description: None,
        }
    }

    #[test]
    fn test_effective_price_prefers_lower_sale_price() {
        let v = variation(1, "x", Decimal::from(100), Some(Decimal::from(80)));
        assert_eq!(v.effective_price(), Decimal::from(80));

        // A "sale" price above the regular price is ignored
        let v = variation(1, "x", Decimal::from(100), Some(Decimal::from(120)));
        assert_eq!(v.effective_price(), Decimal::from(100));

        let v = variation(1, "x", Decimal::from(100), None);
        assert_eq!(v.effective_price(), Decimal::from(100));
    }

    #[test]
    fn test_option_labels_and_display() {
        let product = variable_product();
        assert_eq!(product.option_labels(), vec!["Size", "Color"]);

        let display = product
            .option_display(product.default_variation().unwrap())
            .unwrap();
        assert_eq!(display, "Size: L, Color: Red");
    }

    #[test]
    fn test_option_display_none_for_single() {
        let mut product = variable_product();
        product.kind = ProductKind::Single;
        let variation = product.default_variation().unwrap();
        assert!(product.option_display(variation).is_none());
    }

    #[test]
    fn test_deserialize_product_wire_format() {
        let json = serde_json::json!({
            "id": 42,
            "name": "Clay Mug",
            "slug": "clay-mug",
            "type": "single",
            "variation_name": null,
            "price": "350.00",
            "sale_price": null,
            "media": [{"id": 7, "url": "products/clay-mug.jpg", "alt_text": null}],
            "variations": [{
                "variation_id": 420,
                "name": "Clay Mug",
                "price": "350.00",
                "sale_price": null,
                "qty_available": 3,
                "weight": 250,
                "sku": "MUG-01"
            }],
            "attributes": [{"attribute_name": "Material", "value": "Clay"}],
            "brand_id": null,
            "description": null
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.kind, ProductKind::Single);
        assert_eq!(product.price, Decimal::from(350));
        let v = product.default_variation().unwrap();
        assert_eq!(v.id.as_i64(), 420);
        assert_eq!(v.quantity_available, 3);
        assert_eq!(v.weight, Decimal::from(250));
        assert!(v.is_in_stock());
    }

    #[test]
    fn test_sort_key_params() {
        assert_eq!(SortKey::Latest.as_param(), "latest");
        assert_eq!(SortKey::PriceAsc.as_param(), "price_asc");
        assert_eq!(SortKey::PriceDesc.as_param(), "price_desc");
    }
}
