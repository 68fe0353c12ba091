//! Persisted key-value slot for the cart and auth session.
//!
//! # Slots
//!
//! Key names are fixed so that any client sharing the slot can read them:
//!
//! - `token` - raw bearer token
//! - `isAdmin` - `"true"` / `"false"`
//! - `cart` - JSON array of cart lines
//!
//! # Contract
//!
//! Loads never fail: a missing or unparsable value reads as the empty cart or
//! the logged-out session. Saves are synchronous and happen once per
//! mutation, with no batching.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

use crate::models::session::keys;
use crate::models::{CartState, Session};

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A durable string-to-string slot that survives restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access to the cart and session slots.
///
/// Cheaply cloneable; clones share the same backend.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore").finish_non_exhaustive()
    }
}

impl PersistedStore {
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Load the cart, or an empty cart if none was saved or it is unreadable.
    #[must_use]
    pub fn load_cart(&self) -> CartState {
        let raw = match self.backend.get(keys::CART) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart slot, starting empty");
                return CartState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored cart is unparsable, starting empty");
            CartState::default()
        })
    }

    /// Write the whole cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    pub fn save_cart(&self, cart: &CartState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cart)?;
        self.backend.set(keys::CART, &raw)
    }

    /// Load the session, or the logged-out session if no token is stored.
    #[must_use]
    pub fn load_session(&self) -> Session {
        let read = |key: &str| {
            self.backend.get(key).unwrap_or_else(|e| {
                tracing::warn!(error = %e, key, "Failed to read session slot");
                None
            })
        };

        match read(keys::TOKEN) {
            Some(token) if !token.is_empty() => {
                let is_admin = read(keys::IS_ADMIN).as_deref() == Some("true");
                Session::logged_in(token, is_admin)
            }
            _ => Session::logged_out(),
        }
    }

    /// Write the session. Logging out removes both session keys.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        use secrecy::ExposeSecret;

        match session.token() {
            Some(token) => {
                self.backend.set(keys::TOKEN, token.expose_secret())?;
                self.backend
                    .set(keys::IS_ADMIN, if session.is_admin() { "true" } else { "false" })
            }
            None => {
                self.backend.remove(keys::TOKEN)?;
                self.backend.remove(keys::IS_ADMIN)
            }
        }
    }

    /// Raw access for callers that need a slot outside the cart/session pair.
    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }
}
