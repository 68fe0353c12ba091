//! Unified error handling with Sentry integration.
//!
//! Every fallible storefront operation funnels into [`StorefrontError`].
//! Nothing here is fatal: [`StorefrontError::notice`] turns any error into
//! the user-visible [`Notice`] the view should show, capturing unexpected
//! failures to Sentry on the way.

use thiserror::Error;

use bazaar_core::{DiscountError, EmailError, PriceError, RatingError};

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::notify::Notice;
use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Form input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No star rating, or one off the scale.
    #[error("Please fill all fields and select a star rating")]
    Rating(#[from] RatingError),

    /// A numeric field did not parse or is out of range.
    #[error("{field} {reason}")]
    InvalidNumber {
        /// Form field label.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn number(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidNumber {
            field,
            reason: reason.to_string(),
        }
    }
}

impl From<PriceError> for ValidationError {
    fn from(err: PriceError) -> Self {
        Self::number("Price", err)
    }
}

impl From<DiscountError> for ValidationError {
    fn from(err: DiscountError) -> Self {
        Self::number("Discount", err)
    }
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// User input was rejected locally.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Login or registration failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// The persisted slot could not be written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The action needs a logged-in session.
    #[error("Login required")]
    LoginRequired,

    /// The product has no local stock left.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// The notice a view should show for this error.
    ///
    /// Authorization failures block until the user logs in again; everything
    /// else is a transient error toast. Pure: see [`Self::report`] for Sentry.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(err) => Notice::error(err.to_string()),
            Self::Api(err) if err.is_unauthorized() => Notice::blocking(format!(
                "{}. Please log in again.",
                err.server_message().unwrap_or("Access denied")
            )),
            Self::Api(err) => Notice::error(
                err.server_message()
                    .map_or_else(|| err.to_string(), String::from),
            ),
            Self::Auth(err) => Notice::error(err.to_string()),
            Self::LoginRequired => Notice::blocking("Please log in to continue."),
            Self::OutOfStock(name) => Notice::error(format!("{name} is out of stock")),
            Self::NotFound(what) => Notice::error(format!("{what} not found")),
            Self::Store(_) => Notice::error("Could not save your changes"),
            Self::Config(err) => Notice::error(err.to_string()),
        }
    }

    /// Whether this error is unexpected: transport, store, and config
    /// failures, and API errors the server gave no message for.
    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        match self {
            Self::Store(_) | Self::Config(_) => true,
            Self::Api(e) => !e.is_unauthorized() && e.server_message().is_none(),
            _ => false,
        }
    }

    /// Send an unexpected error to Sentry. Call once, where the error is
    /// surfaced; expected errors are ignored.
    pub fn report(&self) {
        if !self.is_unexpected() {
            return;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    }

    /// Whether the user has to log in (again) before retrying.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        match self {
            Self::LoginRequired => true,
            Self::Api(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use crate::notify::NoticeLevel;

    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::NotFound("Product".to_string());
        assert_eq!(err.to_string(), "Not found: Product");

        let err = StorefrontError::from(ValidationError::MissingField("Name"));
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_unauthorized_is_blocking() {
        let err = StorefrontError::from(ApiError::Unauthorized("Token expired".to_string()));
        let notice = err.notice();
        assert_eq!(notice.level, NoticeLevel::Blocking);
        assert_eq!(notice.message, "Token expired. Please log in again.");
        assert!(err.needs_login());

        let notice = StorefrontError::from(ApiError::Unauthorized(String::new())).notice();
        assert_eq!(notice.message, "Access denied. Please log in again.");
    }

    #[test]
    fn test_server_message_is_surfaced() {
        let err = StorefrontError::from(ApiError::Status {
            status: 400,
            message: "All fields are required".to_string(),
        });
        let notice = err.notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "All fields are required");
        assert!(!err.needs_login());
    }

    #[test]
    fn test_rating_message() {
        let err = ValidationError::from(RatingError::Missing);
        assert_eq!(
            err.to_string(),
            "Please fill all fields and select a star rating"
        );
    }

    #[test]
    fn test_notice_does_not_capture() {
        let err = StorefrontError::from(ApiError::InvalidBase);
        assert!(err.is_unexpected());

        let events = sentry::test::with_captured_events(|| {
            let _ = err.notice();
            let _ = err.notice();
        });
        assert!(events.is_empty());

        let events = sentry::test::with_captured_events(|| err.report());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_expected_errors_are_not_reported() {
        let expected = [
            StorefrontError::LoginRequired,
            StorefrontError::OutOfStock("Phone".to_string()),
            StorefrontError::from(ApiError::Unauthorized("Token expired".to_string())),
            StorefrontError::from(ApiError::Status {
                status: 400,
                message: "All fields are required".to_string(),
            }),
        ];
        let events = sentry::test::with_captured_events(|| {
            for err in &expected {
                err.report();
            }
        });
        assert!(events.is_empty());
    }

    #[test]
    fn test_out_of_stock_notice() {
        let notice = StorefrontError::OutOfStock("Phone".to_string()).notice();
        assert_eq!(notice.message, "Phone is out of stock");
        assert!(!notice.is_blocking());
    }
}
