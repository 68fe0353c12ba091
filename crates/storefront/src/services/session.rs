//! The auth session holder.
//!
//! Owns the current [`Session`], publishes it to subscribers, and writes
//! every change through to the persisted store.

use secrecy::SecretString;
use tokio::sync::watch;

use crate::models::Session;
use crate::store::{PersistedStore, StoreError};

/// Where an admin lands after logging in.
pub const ADMIN_HOME: &str = "/admin";
/// Where everyone else lands after logging in.
pub const HOME: &str = "/";

/// Observable, write-through holder of the current session.
#[derive(Debug)]
pub struct AuthSession {
    state: watch::Sender<Session>,
    store: PersistedStore,
}

impl AuthSession {
    /// Restore the session saved in `store` (logged out if none).
    #[must_use]
    pub fn load(store: PersistedStore) -> Self {
        let session = store.load_session();
        tracing::debug!(
            logged_in = session.is_logged_in(),
            is_admin = session.is_admin(),
            "Restored session"
        );
        Self {
            state: watch::Sender::new(session),
            store,
        }
    }

    /// Replace the session with a logged-in one.
    ///
    /// The in-memory session changes even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session could not be persisted.
    pub fn login(&self, token: impl Into<String>, is_admin: bool) -> Result<(), StoreError> {
        self.replace(Session::logged_in(token, is_admin))
    }

    /// Forget the session, removing both persisted keys.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted keys could not be removed.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.replace(Session::logged_out())
    }

    fn replace(&self, session: Session) -> Result<(), StoreError> {
        let mut result = Ok(());
        self.state.send_modify(|current| {
            result = self.store.save_session(&session);
            *current = session;
        });
        if let Err(e) = &result {
            tracing::error!(error = %e, "Failed to persist session");
        }
        result
    }

    /// A snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    /// Advisory only; the server re-checks every admin request.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    /// The bearer credential to attach to authenticated requests.
    #[must_use]
    pub fn bearer(&self) -> Option<SecretString> {
        self.state.borrow().token().cloned()
    }

    /// Post-login destination: the admin console for admins, home otherwise.
    #[must_use]
    pub fn login_redirect(&self) -> &'static str {
        if self.is_admin() { ADMIN_HOME } else { HOME }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_login_round_trips_through_store() {
        let store = PersistedStore::in_memory();
        let holder = AuthSession::load(store.clone());
        holder.login("abc", true).unwrap();

        let reloaded = AuthSession::load(store);
        assert_eq!(reloaded.session(), Session::logged_in("abc", true));
        assert!(reloaded.is_admin());
        assert_eq!(reloaded.bearer().unwrap().expose_secret(), "abc");
    }

    #[test]
    fn test_logout_clears_store() {
        let store = PersistedStore::in_memory();
        let holder = AuthSession::load(store.clone());
        holder.login("abc", false).unwrap();
        holder.logout().unwrap();

        assert!(!holder.is_logged_in());
        assert!(holder.bearer().is_none());
        assert_eq!(store.load_session(), Session::logged_out());
    }

    #[test]
    fn test_login_redirect() {
        let holder = AuthSession::load(PersistedStore::in_memory());
        assert_eq!(holder.login_redirect(), HOME);

        holder.login("user", false).unwrap();
        assert_eq!(holder.login_redirect(), HOME);

        holder.login("admin", true).unwrap();
        assert_eq!(holder.login_redirect(), ADMIN_HOME);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let holder = AuthSession::load(PersistedStore::in_memory());
        let mut rx = holder.subscribe();
        assert!(!rx.has_changed().unwrap());

        holder.login("abc", false).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_logged_in());
    }
}
