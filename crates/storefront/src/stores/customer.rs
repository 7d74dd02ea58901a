//! Customer store: the signed-in customer's profile.

use secrecy::SecretString;
use tracing::warn;

use crate::api::ApiClient;
use crate::types::Customer;

/// The signed-in customer, when there is one. Guest sessions leave this
/// empty and checkout falls back to guest-order semantics.
#[derive(Debug, Default)]
pub struct CustomerStore {
    customer: Option<Customer>,
}

impl CustomerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.customer.is_some()
    }

    /// Fetch the profile for the attached session token. A failure is logged
    /// and leaves the current profile, so a flaky refresh does not log the
    /// customer out.
    pub async fn load(&mut self, api: &ApiClient) {
        match api.customer_profile().await {
            Ok(customer) => self.customer = Some(customer),
            Err(error) => warn!(%error, "Failed to load customer profile"),
        }
    }

    /// Attach a session token and load the profile behind it.
    pub async fn login(&mut self, api: &ApiClient, token: SecretString) {
        api.set_access_token(token);
        self.load(api).await;
    }

    /// Drop the profile and the session token.
    pub fn logout(&mut self, api: &ApiClient) {
        self.customer = None;
        api.clear_access_token();
    }
}
