//! Authentication error types.

use thiserror::Error;

use crate::error::ValidationError;
use crate::store::StoreError;

/// Errors that can occur during login and registration.
///
/// Server rejections carry the server's own message when it sent one, and a
/// generic fallback otherwise.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form was rejected before reaching the network.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The server refused the credentials, or could not be reached.
    #[error("{0}")]
    LoginFailed(String),

    /// The server refused the registration, or could not be reached.
    #[error("{0}")]
    RegistrationFailed(String),

    /// The session was granted but could not be persisted.
    #[error("could not save session: {0}")]
    Store(#[from] StoreError),
}
