//! Product detail page.
//!
//! Holds the product, its reviews, and a local stock counter. The counter
//! starts at the server's stock and only ever goes down as the user adds the
//! product to their cart; it is never sent back to the server.

use tracing::instrument;

use bazaar_core::{Price, Product, ProductId};

use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::models::AddOutcome;
use crate::notify::Notifier;
use crate::services::cart::Cart;
use crate::services::reviews::{ReviewDraft, ReviewList};
use crate::services::session::AuthSession;

const LOAD_FAILED: &str = "Failed to load product";

/// A loaded product detail view.
#[derive(Debug)]
pub struct ProductPage {
    product: Product,
    reviews: ReviewList,
    local_stock: u32,
    notifier: Notifier,
}

impl ProductPage {
    /// Fetch the product, then its reviews.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` (after a "Failed to load product"
    /// notice) if either request fails.
    #[instrument(skip(api, notifier), fields(id = %id))]
    pub async fn load(
        api: &ApiClient,
        id: &ProductId,
        notifier: Notifier,
    ) -> Result<Self, StorefrontError> {
        let loaded = async {
            let product = api.get_product(id).await?;
            let reviews = ReviewList::fetch(api, id).await?;
            Ok::<_, StorefrontError>((product, reviews))
        }
        .await;

        match loaded {
            Ok((product, reviews)) => Ok(Self::new(product, reviews, notifier)),
            Err(e) => {
                tracing::warn!(error = %e, "Product page failed to load");
                notifier.error(LOAD_FAILED);
                Err(StorefrontError::NotFound("Product".to_string()))
            }
        }
    }

    #[must_use]
    pub fn new(product: Product, reviews: ReviewList, notifier: Notifier) -> Self {
        Self {
            local_stock: product.stock,
            product,
            reviews,
            notifier,
        }
    }

    /// Add one unit to `cart`, unless the local counter is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::OutOfStock` (after notifying) when no local
    /// stock is left.
    pub fn add_to_cart(&mut self, cart: &Cart) -> Result<AddOutcome, StorefrontError> {
        if self.local_stock == 0 {
            let err = StorefrontError::OutOfStock(self.product.name.clone());
            self.notifier.notify(err.notice());
            return Err(err);
        }

        let outcome = cart.add_item(&self.product);
        self.local_stock -= 1;
        Ok(outcome)
    }

    /// Submit a review for this product.
    ///
    /// # Errors
    ///
    /// See [`ReviewList::submit`].
    pub async fn submit_review(
        &mut self,
        api: &ApiClient,
        session: &AuthSession,
        draft: &ReviewDraft,
    ) -> Result<(), StorefrontError> {
        self.reviews.submit(api, session, &self.notifier, draft).await
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn reviews(&self) -> &ReviewList {
        &self.reviews
    }

    /// Units the user can still add in this view.
    #[must_use]
    pub const fn local_stock(&self) -> u32 {
        self.local_stock
    }

    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.local_stock == 0
    }

    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.product.discounted_price()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::notify::NoticeLevel;
    use crate::store::PersistedStore;

    async fn mock_product(server: &MockServer, stock: u32) {
        Mock::given(method("GET"))
            .and(path("/products/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "p1",
                "name": "Phone",
                "price": 200,
                "discount": 25,
                "stock": stock
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_local_stock_runs_out() {
        let server = MockServer::start().await;
        mock_product(&server, 2).await;
        Mock::given(method("GET"))
            .and(path("/reviews/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = ApiClient::new(Url::parse(&server.uri()).unwrap());
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let cart = Cart::load(PersistedStore::in_memory(), notifier.clone());
        let mut page = ProductPage::load(&api, &ProductId::new("p1"), notifier)
            .await
            .unwrap();

        assert_eq!(page.discounted_price(), Price::from_units(150));
        assert_eq!(page.add_to_cart(&cart).unwrap(), AddOutcome::Added);
        assert_eq!(page.add_to_cart(&cart).unwrap(), AddOutcome::QuantityUpdated);
        assert!(page.is_out_of_stock());
        assert!(matches!(
            page.add_to_cart(&cart),
            Err(StorefrontError::OutOfStock(_))
        ));

        assert_eq!(cart.lines()[0].qty.get(), 2);
        assert_eq!(page.product().stock, 2);

        let messages: Vec<_> = std::iter::from_fn(|| notices.try_recv().ok())
            .map(|n| (n.level, n.message))
            .collect();
        assert_eq!(
            messages.last().unwrap(),
            &(NoticeLevel::Error, "Phone is out of stock".to_string())
        );
    }

    #[tokio::test]
    async fn test_review_failure_fails_load() {
        let server = MockServer::start().await;
        mock_product(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/reviews/p1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = ApiClient::new(Url::parse(&server.uri()).unwrap());
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let err = ProductPage::load(&api, &ProductId::new("p1"), notifier)
            .await
            .unwrap_err();

        assert!(matches!(err, StorefrontError::NotFound(_)));
        assert_eq!(notices.try_recv().unwrap().message, LOAD_FAILED);
    }
}
