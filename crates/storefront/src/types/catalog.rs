//! Category, brand, offer and branch types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use velvet_tamarind_core::{BranchId, BrandId, CategoryId, OfferId};

/// A catalog category. Categories form a tree up to three levels deep
/// (category, sub-category, sub-sub-category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Backend category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug, unique among siblings.
    pub slug: String,
    /// Category image, when set.
    pub image_url: Option<String>,
    /// Child categories.
    #[serde(default)]
    pub children: Vec<Category>,
}

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Backend brand ID.
    pub id: BrandId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A promotional offer grouping products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Backend offer ID.
    pub id: OfferId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// When the offer starts. `None` means already running.
    pub starts_at: Option<DateTime<Utc>>,
    /// When the offer ends. `None` means open-ended.
    pub ends_at: Option<DateTime<Utc>>,
}

impl Offer {
    /// Whether the offer is running at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let started = self.starts_at.is_none_or(|start| start <= now);
        let not_ended = self.ends_at.is_none_or(|end| now < end);
        started && not_ended
    }
}

/// A physical store branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Backend branch ID.
    pub id: BranchId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

/// A featured category resolved from a slug path on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedCategory {
    /// Display name of the resolved category.
    pub name: String,
    /// Slug of the resolved category.
    pub slug: String,
    /// Full slug path as configured ("women/bags/totes").
    pub path: String,
    /// Category image, when set.
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_offer_active_window() {
        let offer = Offer {
            id: 1.into(),
            name: "Eid Sale".to_string(),
            slug: "eid-sale".to_string(),
            starts_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            ends_at: Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()),
        };

        let before = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let during = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap();

        assert!(!offer.is_active(before));
        assert!(offer.is_active(during));
        assert!(!offer.is_active(after));
    }

    #[test]
    fn test_offer_open_ended() {
        let offer = Offer {
            id: 1.into(),
            name: "Clearance".to_string(),
            slug: "clearance".to_string(),
            starts_at: None,
            ends_at: None,
        };
        assert!(offer.is_active(Utc::now()));
    }
}
