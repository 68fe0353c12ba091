//! Session-related types.
//!
//! The auth session is a bearer token plus an admin flag, persisted under
//! fixed slot keys shared with every other client of the same store.

use secrecy::{ExposeSecret, SecretString};

/// The current authentication state.
///
/// No token means logged out. `is_admin` only gates UI; the server
/// re-validates the token on every admin-only request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    is_admin: bool,
}

impl Session {
    /// A logged-in session.
    #[must_use]
    pub fn logged_in(token: impl Into<String>, is_admin: bool) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            is_admin,
        }
    }

    /// The logged-out session (`{ token: null, isAdmin: false }`).
    #[must_use]
    pub fn logged_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Admin flag, meaningful only while logged in.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_logged_in() && self.is_admin
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        let tokens_match = match (&self.token, &other.token) {
            (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
            (None, None) => true,
            _ => false,
        };
        tokens_match && self.is_admin() == other.is_admin()
    }
}

impl Eq for Session {}

/// Persisted slot keys. Names are fixed for compatibility with existing
/// stored data.
pub mod keys {
    /// Raw bearer token string.
    pub const TOKEN: &str = "token";

    /// Stringified boolean (`"true"` / `"false"`).
    pub const IS_ADMIN: &str = "isAdmin";

    /// JSON array of cart lines.
    pub const CART: &str = "cart";
}
