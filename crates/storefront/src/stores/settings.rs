//! Settings store.

use crate::api::{ApiClient, ApiError};
use crate::error::CheckoutError;
use crate::types::StoreSettings;

/// Store-wide settings for the session. Checkout math cannot run without
/// them, so loading failures propagate instead of being swallowed.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: Option<StoreSettings>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load store settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.settings = Some(api.store_settings().await?);
        Ok(())
    }

    /// Drop the client-side settings cache and load fresh settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn reload(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        api.invalidate_settings().await;
        self.load(api).await
    }

    /// The loaded settings, when any.
    #[must_use]
    pub fn settings(&self) -> Option<&StoreSettings> {
        self.settings.as_ref()
    }

    /// The loaded settings, or [`CheckoutError::SettingsNotLoaded`].
    ///
    /// # Errors
    ///
    /// Returns an error when settings have not been loaded yet.
    pub fn require(&self) -> Result<&StoreSettings, CheckoutError> {
        self.settings
            .as_ref()
            .ok_or(CheckoutError::SettingsNotLoaded)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.settings.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;

    #[test]
    fn test_require_before_load_errors() {
        let store = SettingsStore::new();
        assert!(!store.is_loaded());
        assert!(matches!(
            store.require(),
            Err(CheckoutError::SettingsNotLoaded)
        ));
    }
}
