//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_BASE_URL` - Base URL of the commerce backend API
//!
//! ## Optional
//! - `STOREFRONT_MEDIA_BASE_URL` - Base URL for media assets (default: API base URL)
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `STOREFRONT_LOCATION_SHIPPING` - Charge shipping by delivery location (default: true)
//! - `STOREFRONT_CUSTOM_PICKUP_POINTS` - Pickup-point delivery requires a point id (default: false)
//! - `STOREFRONT_ACCESS_TOKEN` - Seed access token for an already-authenticated session

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront SDK configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce backend API
    pub api_base_url: Url,
    /// Base URL that relative media paths are resolved against
    pub media_base_url: Url,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Delivery feature flags
    pub delivery: DeliveryConfig,
    /// Access token for a session that is already authenticated
    pub access_token: Option<SecretString>,
}

/// Delivery feature flags.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryConfig {
    /// When false, no location-based shipping charge is applied at all
    pub location_based_shipping: bool,
    /// When true, pickup-point delivery requires a selected pickup point
    pub custom_pickup_points: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            location_based_shipping: true,
            custom_pickup_points: false,
        }
    }
}

impl StorefrontConfig {
    /// Create a configuration with defaults for everything but the API base URL.
    ///
    /// The media base URL defaults to the API base URL; both are normalized to
    /// end with a slash so relative paths join predictably.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        let api_base_url = ensure_trailing_slash(api_base_url);
        Self {
            media_base_url: api_base_url.clone(),
            api_base_url,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            delivery: DeliveryConfig::default(),
            access_token: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_url_env("STOREFRONT_API_BASE_URL")?;
        let media_base_url = match get_optional_env("STOREFRONT_MEDIA_BASE_URL") {
            Some(raw) => ensure_trailing_slash(parse_url("STOREFRONT_MEDIA_BASE_URL", &raw)?),
            None => api_base_url.clone(),
        };
        let request_timeout_secs = get_env_or_default(
            "STOREFRONT_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let delivery = DeliveryConfig {
            location_based_shipping: get_bool_env("STOREFRONT_LOCATION_SHIPPING", true)?,
            custom_pickup_points: get_bool_env("STOREFRONT_CUSTOM_PICKUP_POINTS", false)?,
        };

        let access_token = get_optional_env("STOREFRONT_ACCESS_TOKEN").map(SecretString::from);

        Ok(Self {
            api_base_url,
            media_base_url,
            request_timeout_secs,
            delivery,
            access_token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as a URL, slash-normalized.
fn get_url_env(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    Ok(ensure_trailing_slash(parse_url(key, &raw)?))
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a boolean environment variable, accepting `true`/`false`/`1`/`0`.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match get_optional_env(key) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected true/false, got '{other}'"),
            )),
        },
    }
}

/// Normalize a URL so its path ends with a slash.
///
/// `Url::join` drops the last path segment of a slash-less base, which would
/// silently rewrite endpoint paths.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = StorefrontConfig::new(Url::parse("https://api.example.com/v1").unwrap());

        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.media_base_url, config.api_base_url);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.delivery.location_based_shipping);
        assert!(!config.delivery.custom_pickup_points);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_ensure_trailing_slash() {
        let url = Url::parse("https://cdn.example.com/media").unwrap();
        assert_eq!(
            ensure_trailing_slash(url).as_str(),
            "https://cdn.example.com/media/"
        );

        let url = Url::parse("https://cdn.example.com/media/").unwrap();
        assert_eq!(
            ensure_trailing_slash(url).as_str(),
            "https://cdn.example.com/media/"
        );
    }

    #[test]
    fn test_parse_url_invalid() {
        let result = parse_url("TEST_URL", "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_get_bool_env_parsing() {
        // Variable absent - default wins
        assert!(get_bool_env("STOREFRONT_TEST_BOOL_UNSET", true).unwrap());
        assert!(!get_bool_env("STOREFRONT_TEST_BOOL_UNSET", false).unwrap());
    }

    #[test]
    fn test_from_env_round_trip() {
        // Single test to avoid parallel-test env races: missing, then set, then clean up
        unsafe { std::env::remove_var("STOREFRONT_API_BASE_URL") };
        assert!(matches!(
            StorefrontConfig::from_env(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        unsafe {
            std::env::set_var("STOREFRONT_API_BASE_URL", "https://api.example.com/v1");
            std::env::set_var("STOREFRONT_LOCATION_SHIPPING", "false");
        }
        let config = StorefrontConfig::from_env().unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/v1/");
        assert!(!config.delivery.location_based_shipping);

        unsafe {
            std::env::remove_var("STOREFRONT_API_BASE_URL");
            std::env::remove_var("STOREFRONT_LOCATION_SHIPPING");
        }
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let mut config = StorefrontConfig::new(Url::parse("https://api.example.com").unwrap());
        config.access_token = Some(SecretString::from("super_secret_token_value"));

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_token_value"));
    }
}
