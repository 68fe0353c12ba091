//! `reqwest`-based implementation of the API client.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use bazaar_core::{Product, ProductId, Review};

use super::ApiError;
use super::types::{
    AdminDashboard, AuthGrant, LoginRequest, NewReview, ProductInput, ProductPage,
    ProductPageBody, RegisterRequest, ServerMessage,
};

/// Longest slice of a response body written to the log.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share one connection pool. Every call goes to the
/// network; nothing is cached.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000/api`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client with a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&SecretString>) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the body text of a success response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(
            status = %status,
            body = %truncate(&body),
            "API returned non-success status"
        );
        Err(status_error(status, &body))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch one page of the listing.
    ///
    /// `search` is sent only when given; `page` and `limit` always are.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a listing.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        search: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<ProductPage, ApiError> {
        let mut url = self.endpoint(&["products"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = search {
                pairs.append_pair("search", search);
            }
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("limit", &limit.to_string());
        }

        let body: ProductPageBody = self.send(self.request(Method::GET, url, None)).await?;
        let page = ProductPage::from(body);
        debug!(count = page.products.len(), pages = page.pages, "Fetched product page");
        Ok(page)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, or another error if the
    /// request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send(self.request(Method::GET, url, None)).await
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the server rejects the token.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products"])?;
        self.send(self.request(Method::POST, url, Some(token)).json(input))
            .await
    }

    /// Replace a product's fields (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the server rejects the token.
    #[instrument(skip(self, token, input), fields(id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send(self.request(Method::PUT, url, Some(token)).json(input))
            .await
    }

    /// Delete a product (admin). Returns the server's confirmation message,
    /// if it sent one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the server rejects the token.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_product(
        &self,
        token: &SecretString,
        id: &ProductId,
    ) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        let body = self
            .send_raw(self.request(Method::DELETE, url, Some(token)))
            .await?;
        Ok(serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|m| m.message))
    }

    // =========================================================================
    // Review Methods
    // =========================================================================

    /// Reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product = %product_id))]
    pub async fn get_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let url = self.endpoint(&["reviews", product_id.as_str()])?;
        self.send(self.request(Method::GET, url, None)).await
    }

    /// Post a review. The server requires an authenticated token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, token, review), fields(product = %product_id))]
    pub async fn create_review(
        &self,
        token: Option<&SecretString>,
        product_id: &ProductId,
        review: &NewReview,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint(&["reviews", product_id.as_str()])?;
        self.send(self.request(Method::POST, url, token).json(review))
            .await
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the server message on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let url = self.endpoint(&["users", "login"])?;
        self.send(
            self.request(Method::POST, url, None)
                .json(&LoginRequest { email, password }),
        )
        .await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the server message (e.g. duplicate email).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let url = self.endpoint(&["users", "register"])?;
        self.send(
            self.request(Method::POST, url, None)
                .json(&RegisterRequest {
                    name,
                    email,
                    password,
                }),
        )
        .await
    }

    // =========================================================================
    // Admin Methods
    // =========================================================================

    /// The admin greeting; doubles as a server-side check of admin rights.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is not an admin's.
    #[instrument(skip(self, token))]
    pub async fn admin_dashboard(&self, token: &SecretString) -> Result<AdminDashboard, ApiError> {
        let url = self.endpoint(&["admin"])?;
        self.send(self.request(Method::GET, url, Some(token))).await
    }
}

/// Map a non-success response to an error, keeping the server's message.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ServerMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
