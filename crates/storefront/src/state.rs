//! Application state shared across views.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::services::{AdminConsole, AuthService, AuthSession, Cart, Catalog};
use crate::store::{FileStore, PersistedStore};

/// Application state shared across all views.
///
/// This struct is cheaply cloneable via `Arc` and owns the long-lived
/// pieces: the API client, the persisted store, the cart, the session, and
/// the notifier every service reports through.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    store: PersistedStore,
    notifier: Notifier,
    cart: Cart,
    session: AuthSession,
}

impl AppState {
    /// Create state persisted to `config.state_path`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = PersistedStore::new(FileStore::new(&config.state_path));
        Self::with_store(config, store)
    }

    /// Create state on an explicit store (e.g. in-memory for tests).
    ///
    /// The cart and session are restored from `store` immediately.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: PersistedStore) -> Self {
        let api = ApiClient::new(config.api_url.clone());
        let notifier = Notifier::default();
        let cart = Cart::load(store.clone(), notifier.clone());
        let session = AuthSession::load(store.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                store,
                notifier,
                cart,
                session,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn store(&self) -> &PersistedStore {
        &self.inner.store
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.inner.cart
    }

    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// A listing controller at the storefront page size.
    #[must_use]
    pub fn catalog(&self) -> Catalog<ApiClient> {
        Catalog::new(
            self.inner.api.clone(),
            self.inner.notifier.clone(),
            self.inner.config.page_size,
        )
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.api, &self.inner.session)
    }

    /// The admin console at the admin page size.
    #[must_use]
    pub fn admin(&self) -> AdminConsole<'_> {
        AdminConsole::new(
            &self.inner.api,
            &self.inner.session,
            &self.inner.notifier,
            self.inner.config.admin_page_size,
        )
    }
}
