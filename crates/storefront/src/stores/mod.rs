//! Session stores and the [`Storefront`] façade that wires them together.
//!
//! Each store is a plain struct owning one slice of session state, with
//! `&mut self` actions and pure getters. Remote actions borrow the shared
//! [`ApiClient`]. Cross-store reads (cart totals in checkout, categories in
//! home) take the other store by reference, so every data dependency is
//! visible in the signature.

mod cart;
mod catalog;
mod checkout;
mod compare;
mod customer;
mod customizer;
mod home;
mod product_view;
mod products;
mod settings;
mod theme;
mod wishlist;

pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use checkout::CheckoutStore;
pub use compare::CompareStore;
pub use customer::CustomerStore;
pub use customizer::CustomizerStore;
pub use home::HomeStore;
pub use product_view::{AddMode, AddedToCart, ProductViewStore};
pub use products::ProductListStore;
pub use settings::SettingsStore;
pub use theme::ThemeStore;
pub use wishlist::WishlistStore;

use secrecy::SecretString;
use tracing::{instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::error::{CartError, CheckoutError, StorefrontError, ThemeError};
use crate::payment::PaymentHandler;
use crate::types::{CartItem, CheckoutTotals, OrderOutcome};

/// One storefront session: the API client plus every store.
///
/// The stores are public fields; work with them directly for anything beyond
/// the common flows. The methods here cover the flows that touch several
/// stores at once, such as bootstrapping a session or placing an order.
pub struct Storefront {
    config: StorefrontConfig,
    api: ApiClient,
    pub cart: CartStore,
    pub checkout: CheckoutStore,
    pub catalog: CatalogStore,
    pub settings: SettingsStore,
    pub customer: CustomerStore,
    pub home: HomeStore,
    pub products: ProductListStore,
    pub product_view: ProductViewStore,
    pub quick_view: ProductViewStore,
    pub wishlist: WishlistStore,
    pub compare: CompareStore,
    pub theme: ThemeStore,
    pub customizer: CustomizerStore,
}

impl Storefront {
    /// Create a session from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config,
            api,
            cart: CartStore::new(),
            checkout: CheckoutStore::new(),
            catalog: CatalogStore::new(),
            settings: SettingsStore::new(),
            customer: CustomerStore::new(),
            home: HomeStore::new(),
            products: ProductListStore::new(),
            product_view: ProductViewStore::new(),
            quick_view: ProductViewStore::new(),
            wishlist: WishlistStore::new(),
            compare: CompareStore::new(),
            theme: ThemeStore::new(),
            customizer: CustomizerStore::new(),
        })
    }

    /// Create a session from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid, or if
    /// the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, StorefrontError> {
        Self::new(StorefrontConfig::from_env()?)
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Load everything a fresh session needs: settings, the category tree,
    /// brands, offers, branches and home content, then the customer profile
    /// and server cart when an access token is present.
    ///
    /// Best-effort throughout. Failures are logged; a missing piece surfaces
    /// later through the store that needs it (checkout refuses to compute
    /// without settings, navigation stays empty without categories).
    #[instrument(skip_all)]
    pub async fn bootstrap(&mut self) {
        if let Err(error) = self.settings.load(&self.api).await {
            warn!(%error, "Failed to load store settings during bootstrap");
        }
        if let Err(error) = self.catalog.load_categories(&self.api).await {
            warn!(%error, "Failed to load categories during bootstrap");
        }
        self.catalog.load_brands(&self.api).await;
        self.catalog.load_offers(&self.api).await;
        self.catalog.load_branches(&self.api).await;
        self.home.load(&self.api).await;

        if self.api.has_access_token() {
            self.customer.load(&self.api).await;
            if let Err(error) = self.cart.sync(&self.api).await {
                warn!(%error, "Failed to sync cart during bootstrap");
            }
        }
    }

    /// Attach a session token, load the profile, and merge the guest cart
    /// with the server cart.
    pub async fn login(&mut self, token: SecretString) {
        self.customer.login(&self.api, token).await;
        if let Err(error) = self.cart.sync(&self.api).await {
            warn!(%error, "Failed to sync cart after login");
        }
    }

    /// Drop the session token and the loaded profile. The cart stays; it
    /// goes back to being a guest cart.
    pub fn logout(&mut self) {
        self.customer.logout(&self.api);
    }

    // =========================================================================
    // Cart & checkout flows
    // =========================================================================

    /// Add a line to the cart. See [`CartStore::add`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when stock is tracked and too low.
    pub async fn add_to_cart(&mut self, item: CartItem) -> Result<(), CartError> {
        self.cart.add(&self.api, item).await
    }

    /// Current checkout amounts for the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SettingsNotLoaded`] before settings arrive.
    pub fn totals(&self) -> Result<CheckoutTotals, CheckoutError> {
        let settings = self.settings.require()?;
        Ok(self
            .checkout
            .totals(&self.cart, &self.config.delivery, settings))
    }

    /// Redeem reward points against the logged-in customer's balance.
    ///
    /// # Errors
    ///
    /// Returns an error when settings are missing, the store has no
    /// redemption rules, or `points` fails the balance/bounds checks.
    pub fn apply_reward_points(&mut self, points: i64) -> Result<(), CheckoutError> {
        let settings = self.settings.require()?;
        self.checkout
            .apply_reward_points(points, self.customer.customer(), settings)
    }

    /// Validate the typed coupon code against the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::CouponRejected`] with the backend's message,
    /// or an API error when the call fails.
    pub async fn apply_coupon(&mut self) -> Result<String, CheckoutError> {
        self.checkout.apply_coupon(&self.api, &self.cart).await
    }

    /// Look up the typed gift card number and hold the card for payment.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::GiftCardRejected`] when the card is unknown,
    /// or an API error when the call fails.
    pub async fn check_gift_card(&mut self) -> Result<(), CheckoutError> {
        self.checkout.check_gift_card(&self.api).await
    }

    /// Place the order built from the cart and checkout state, then collect
    /// payment through `payment` unless the order is cash on delivery.
    ///
    /// # Errors
    ///
    /// Returns an error when settings are missing, local validation fails,
    /// or the backend rejects the order. See [`CheckoutStore::place_order`].
    pub async fn place_order(
        &mut self,
        payment: &impl PaymentHandler,
    ) -> Result<OrderOutcome, CheckoutError> {
        let settings = self.settings.require()?;
        self.checkout
            .place_order(
                &self.api,
                &mut self.cart,
                self.customer.customer(),
                &self.config.delivery,
                settings,
                payment,
            )
            .await
    }

    // =========================================================================
    // Quick view
    // =========================================================================

    /// Load a product into the quick-view modal's own selection state.
    ///
    /// # Errors
    ///
    /// Returns an error when the product cannot be fetched.
    pub async fn open_quick_view(&mut self, slug: &str) -> Result<(), ApiError> {
        self.quick_view.load(&self.api, slug).await
    }

    pub fn close_quick_view(&mut self) {
        self.quick_view.clear();
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Persist the theme settings and drop the customizer's change stack.
    ///
    /// # Errors
    ///
    /// Returns an error when the theme is not loaded or the save fails.
    pub async fn save_theme(&mut self) -> Result<(), ThemeError> {
        self.theme.save(&self.api).await?;
        self.customizer.clear_changes();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig::new(Url::parse("http://localhost:9999/api/v1").unwrap())
    }

    #[test]
    fn test_new_session_is_empty() {
        let shop = Storefront::new(config()).unwrap();

        assert!(!shop.cart.is_loaded());
        assert!(shop.settings.settings().is_none());
        assert!(!shop.customer.is_logged_in());
        assert!(!shop.api().has_access_token());
        assert!(matches!(
            shop.totals(),
            Err(CheckoutError::SettingsNotLoaded)
        ));
    }

    #[test]
    fn test_seeded_token_survives_construction() {
        let mut config = config();
        config.access_token = Some(SecretString::from("tok-123"));

        let shop = Storefront::new(config).unwrap();
        assert!(shop.api().has_access_token());
    }
}
