//! Home page content types.

use serde::{Deserialize, Serialize};

/// Content blocks configured for the home page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeContent {
    /// Featured categories as slug paths ("women/bags/totes"). Resolved
    /// against the category tree by the home store.
    #[serde(default)]
    pub featured_categories: Vec<String>,
    /// Product sections rendered as rows ("Trending", "New Arrivals").
    #[serde(default)]
    pub sections: Vec<HomeSection>,
    /// Hero sliders.
    #[serde(default)]
    pub sliders: Vec<Slider>,
}

/// A product section on the home page. Its products are fetched through the
/// product listing endpoint with `section_slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    /// Display title.
    pub name: String,
    /// Slug used to fetch the section's products.
    pub slug: String,
}

/// A hero slider entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slider {
    /// Slide image URL.
    pub image_url: String,
    /// Link target, when the slide is clickable.
    pub link: Option<String>,
    /// Overlay title, when set.
    pub title: Option<String>,
}
