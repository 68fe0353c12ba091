//! HTTP client for the catalog, review, user, and admin API.
//!
//! # Endpoints
//!
//! - `GET /products?search=&page=&limit=` - paged listing
//! - `GET /products/:id`, `POST /products`, `PUT /products/:id`,
//!   `DELETE /products/:id` (writes are admin-only)
//! - `GET /reviews/:productId`, `POST /reviews/:productId` (authenticated)
//! - `POST /users/login`, `POST /users/register`
//! - `GET /admin` - admin dashboard greeting
//!
//! Error bodies carry an optional `{ "message": ... }` which is surfaced to
//! the user verbatim.

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the credential (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: u16,
        /// Server message, or the status reason when the body had none.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments.
    #[error("API base URL cannot be a base")]
    InvalidBase,
}

impl ApiError {
    /// The message the server put in its error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message) | Self::NotFound(message) | Self::Status { message, .. }
                if !message.is_empty() =>
            {
                Some(message)
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = ApiError::Status {
            status: 500,
            message: "Database down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: Database down");
    }

    #[test]
    fn test_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: "All fields are required".to_string(),
        };
        assert_eq!(err.server_message(), Some("All fields are required"));
        assert_eq!(ApiError::Unauthorized(String::new()).server_message(), None);
        assert_eq!(ApiError::InvalidBase.server_message(), None);
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(ApiError::Unauthorized("Not authorized".to_string()).is_unauthorized());
        assert!(!ApiError::NotFound("x".to_string()).is_unauthorized());
    }
}
