//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_URL` - Base URL of the catalog API (e.g., `http://localhost:5000/api`)
//!
//! ## Optional
//! - `BAZAAR_STATE_PATH` - JSON file holding the cart and session (default: `.bazaar/state.json`)
//! - `BAZAAR_PAGE_SIZE` - Products per storefront listing page (default: 12)
//! - `BAZAAR_ADMIN_PAGE_SIZE` - Products per admin listing page (default: 16)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_STATE_PATH: &str = ".bazaar/state.json";
const DEFAULT_PAGE_SIZE: u32 = 12;
const DEFAULT_ADMIN_PAGE_SIZE: u32 = 16;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL every API path is appended to
    pub api_url: Url,
    /// Where the cart and session survive restarts
    pub state_path: PathBuf,
    /// Products per storefront listing page
    pub page_size: u32,
    /// Products per admin listing page
    pub admin_page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let api_url = parse_api_url("BAZAAR_API_URL", &env.required("BAZAAR_API_URL")?)?;
        let state_path = PathBuf::from(env.or_default("BAZAAR_STATE_PATH", DEFAULT_STATE_PATH));
        let page_size = env.page_size("BAZAAR_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let admin_page_size = env.page_size("BAZAAR_ADMIN_PAGE_SIZE", DEFAULT_ADMIN_PAGE_SIZE)?;
        let sentry_dsn = env.optional("SENTRY_DSN");

        Ok(Self {
            api_url,
            state_path,
            page_size,
            admin_page_size,
            sentry_dsn,
        })
    }

    /// Configuration pointing at `api_url` with every optional value defaulted.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            admin_page_size: DEFAULT_ADMIN_PAGE_SIZE,
            sentry_dsn: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get a required variable. Blank counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Blank counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a positive page size.
    fn page_size(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        match raw.parse::<u32>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be at least 1".to_string(),
            )),
            Ok(size) => Ok(size),
            Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }
}

/// Parse the API base URL, requiring an `http(s)` URL that can take paths.
fn parse_api_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected an http(s) URL, got {raw}"),
        ));
    }
    Ok(url)
}
