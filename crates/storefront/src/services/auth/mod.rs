//! Login and registration flows.
//!
//! Forms are validated locally first; only a valid form reaches the API.
//! A successful login is written through the [`AuthSession`] so it survives
//! restarts.

mod error;

pub use error::AuthError;

use tracing::instrument;

use bazaar_core::Email;

use crate::api::ApiClient;
use crate::error::{ValidationError, add_breadcrumb};
use crate::services::session::AuthSession;

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

/// Where to go after a successful registration.
pub const REGISTERED_REDIRECT: &str = "/login";

/// Email and password as typed.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Check required fields and the email shape.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in field order.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        let email = require("Email", &self.email)?;
        require("Password", &self.password)?;
        Ok(Email::parse(email)?)
    }
}

/// Name, email and password as typed.
#[derive(Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Check required fields and the email shape.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in field order.
    pub fn validate(&self) -> Result<(String, Email), ValidationError> {
        let name = require("Name", &self.name)?;
        let email = require("Email", &self.email)?;
        require("Password", &self.password)?;
        Ok((name.to_string(), Email::parse(email)?))
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Authentication service.
///
/// Borrowed from [`crate::state::AppState::auth`] for the duration of one
/// form submission.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: &'a AuthSession,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a AuthSession) -> Self {
        Self { api, session }
    }

    /// Log in and store the granted session.
    ///
    /// Returns the location to navigate to: `/admin` for admins, `/`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` without any request for a bad form, and
    /// `AuthError::LoginFailed` with the server message (or "Login failed")
    /// when the server refuses.
    #[instrument(skip(self, form))]
    pub async fn login(&self, form: &LoginForm) -> Result<&'static str, AuthError> {
        let email = form.validate()?;

        let grant = self
            .api
            .login(email.as_str(), &form.password)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Login rejected");
                AuthError::LoginFailed(
                    e.server_message().unwrap_or(LOGIN_FALLBACK).to_string(),
                )
            })?;

        self.session.login(grant.token, grant.is_admin)?;
        add_breadcrumb("auth", "Logged in", None);
        Ok(self.session.login_redirect())
    }

    /// Create an account. The user logs in separately afterwards.
    ///
    /// Returns the location to navigate to (the login page).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` without any request for a bad form, and
    /// `AuthError::RegistrationFailed` with the server message (or
    /// "Registration failed") when the server refuses.
    #[instrument(skip(self, form))]
    pub async fn register(&self, form: &RegisterForm) -> Result<&'static str, AuthError> {
        let (name, email) = form.validate()?;

        self.api
            .register(&name, email.as_str(), &form.password)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Registration rejected");
                AuthError::RegistrationFailed(
                    e.server_message().unwrap_or(REGISTER_FALLBACK).to_string(),
                )
            })?;

        add_breadcrumb("auth", "Registered", None);
        Ok(REGISTERED_REDIRECT)
    }

    /// Drop the session everywhere.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the persisted slot could not be cleared.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.logout()?;
        add_breadcrumb("auth", "Logged out", None);
        Ok(())
    }
}
