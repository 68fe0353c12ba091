//! The catalog query controller.
//!
//! Drives [`Listing`] from user navigation: every navigation makes a new
//! query current, fetches it, and publishes the result only if that query is
//! still current when the response arrives. A slow page-1 response that lands
//! after page 2 was requested is dropped on the floor.

use std::future::Future;

use tokio::sync::watch;
use tracing::instrument;
use url::Url;

use crate::api::{ApiClient, ApiError};
use crate::models::{Listing, ListingQuery, ListingResult};
use crate::notify::Notifier;

/// Message shown when the current query's fetch fails.
pub const FETCH_FAILED: &str = "Failed to fetch products";

/// Anything that can serve a page of the product listing.
pub trait CatalogSource: Send + Sync {
    /// Fetch `query`'s page with at most `limit` items.
    fn fetch_listing(
        &self,
        query: &ListingQuery,
        limit: u32,
    ) -> impl Future<Output = Result<ListingResult, ApiError>> + Send;
}

impl CatalogSource for ApiClient {
    async fn fetch_listing(
        &self,
        query: &ListingQuery,
        limit: u32,
    ) -> Result<ListingResult, ApiError> {
        let page = self
            .list_products(Some(query.search()), query.page(), limit)
            .await?;
        Ok(ListingResult::new(page.products, page.pages))
    }
}

/// Observable listing bound to a [`CatalogSource`].
#[derive(Debug)]
pub struct Catalog<S> {
    source: S,
    listing: watch::Sender<Listing>,
    notifier: Notifier,
    page_size: u32,
}

impl<S: CatalogSource> Catalog<S> {
    #[must_use]
    pub fn new(source: S, notifier: Notifier, page_size: u32) -> Self {
        Self {
            source,
            listing: watch::Sender::new(Listing::new()),
            notifier,
            page_size: page_size.max(1),
        }
    }

    /// Load whatever `url`'s query string asks for (e.g. a shared link or a
    /// browser reload).
    pub async fn open(&self, url: &Url) -> bool {
        self.load(ListingQuery::from_url(url)).await
    }

    /// Start a new search from page 1.
    pub async fn search(&self, term: impl Into<String>) -> bool {
        self.load(ListingQuery::search_for(term)).await
    }

    /// Jump to `page`, keeping the current search term. The page is not
    /// clamped here; use [`crate::models::Pagination`] for prev/next targets.
    pub async fn go_to_page(&self, page: u32) -> bool {
        let query = self.current_query().with_page(page);
        self.load(query).await
    }

    /// Fetch the current query again.
    pub async fn reload(&self) -> bool {
        let query = self.current_query();
        self.load(query).await
    }

    /// Make `query` current and fetch it.
    ///
    /// Returns whether this call's result was applied; `false` means a newer
    /// navigation superseded it while the request was in flight.
    #[instrument(skip(self, query), fields(page = query.page(), search = %query.search()))]
    pub async fn load(&self, query: ListingQuery) -> bool {
        let mut ticket = None;
        self.listing.send_modify(|listing| ticket = Some(listing.begin(query)));
        let Some(ticket) = ticket else {
            return false;
        };

        match self.source.fetch_listing(ticket.query(), self.page_size).await {
            Ok(result) => {
                let applied = self
                    .listing
                    .send_if_modified(|listing| listing.complete(&ticket, result));
                if !applied {
                    tracing::debug!("Discarding superseded listing result");
                }
                applied
            }
            Err(e) => {
                let current = self.listing.send_if_modified(|listing| listing.fail(&ticket));
                if current {
                    tracing::warn!(error = %e, "Listing fetch failed");
                    self.notifier.error(FETCH_FAILED);
                } else {
                    tracing::debug!(error = %e, "Ignoring failure of superseded listing fetch");
                }
                current
            }
        }
    }

    fn current_query(&self) -> ListingQuery {
        self.listing.borrow().query().cloned().unwrap_or_default()
    }

    /// Navigable location mirroring the current query.
    #[must_use]
    pub fn href(&self) -> String {
        self.listing.borrow().href()
    }

    #[must_use]
    pub fn snapshot(&self) -> Listing {
        self.listing.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Listing> {
        self.listing.subscribe()
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use bazaar_core::{Discount, Price, Product, ProductId};

    use super::*;
    use crate::models::ListingState;
    use crate::notify::NoticeLevel;

    type Reply = Result<ListingResult, ApiError>;

    /// Source whose responses are released by the test, one gate per page.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<u32, oneshot::Receiver<Reply>>>,
        seen: Mutex<Vec<(ListingQuery, u32)>>,
    }

    impl GatedSource {
        fn gate(&self, page: u32) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(page, rx);
            tx
        }
    }

    impl CatalogSource for GatedSource {
        async fn fetch_listing(&self, query: &ListingQuery, limit: u32) -> Reply {
            self.seen.lock().unwrap().push((query.clone(), limit));
            let rx = self.gates.lock().unwrap().remove(&query.page());
            match rx {
                Some(rx) => rx.await.unwrap(),
                None => Ok(ListingResult::new(Vec::new(), 1)),
            }
        }
    }

    fn page_of(id: &str, pages: u32) -> Reply {
        Ok(ListingResult::new(
            vec![Product {
                id: ProductId::new(id),
                name: id.to_string(),
                brand: None,
                price: Price::from_units(1),
                discount: Discount::NONE,
                stock: 1,
                images: Vec::new(),
                variants: Vec::new(),
                description: None,
                category: None,
            }],
            pages,
        ))
    }

    fn server_error() -> Reply {
        Err(ApiError::Status {
            status: 500,
            message: String::new(),
        })
    }

    #[tokio::test]
    async fn test_only_latest_page_is_displayed() {
        let source = GatedSource::default();
        let page1 = source.gate(1);
        let page2 = source.gate(2);
        let catalog = Catalog::new(source, Notifier::default(), 12);

        let (first, second, ()) = tokio::join!(
            catalog.load(ListingQuery::new(1, "")),
            catalog.load(ListingQuery::new(2, "")),
            async {
                tokio::task::yield_now().await;
                page2.send(page_of("p2", 2)).unwrap();
                tokio::task::yield_now().await;
                page1.send(page_of("p1", 2)).unwrap();
            }
        );

        assert!(!first);
        assert!(second);
        let listing = catalog.snapshot();
        assert_eq!(listing.items()[0].id.as_str(), "p2");
        assert_eq!(listing.query().unwrap().page(), 2);
        assert_eq!(catalog.href(), "/?search=&page=2");
    }

    #[tokio::test]
    async fn test_stale_failure_is_silent() {
        let source = GatedSource::default();
        let page1 = source.gate(1);
        let page2 = source.gate(2);
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let catalog = Catalog::new(source, notifier, 12);

        let (first, second, ()) = tokio::join!(
            catalog.load(ListingQuery::new(1, "")),
            catalog.load(ListingQuery::new(2, "")),
            async {
                tokio::task::yield_now().await;
                page1.send(server_error()).unwrap();
                page2.send(page_of("p2", 2)).unwrap();
            }
        );

        assert!(!first);
        assert!(second);
        assert!(notices.try_recv().is_err());
        assert_eq!(catalog.snapshot().items().len(), 1);
    }

    #[tokio::test]
    async fn test_current_failure_notifies() {
        let source = GatedSource::default();
        let reply = source.gate(1);
        reply.send(server_error()).unwrap();
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let catalog = Catalog::new(source, notifier, 12);

        assert!(catalog.load(ListingQuery::default()).await);

        assert_eq!(catalog.snapshot().state(), &ListingState::Failed);
        assert!(catalog.snapshot().items().is_empty());
        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, FETCH_FAILED);
    }

    #[tokio::test]
    async fn test_navigation_keeps_or_resets_query() {
        let catalog = Catalog::new(GatedSource::default(), Notifier::default(), 12);

        let url = Url::parse("http://shop.local/?search=phone&page=2").unwrap();
        catalog.open(&url).await;
        assert_eq!(catalog.href(), "/?search=phone&page=2");

        catalog.go_to_page(3).await;
        assert_eq!(catalog.href(), "/?search=phone&page=3");

        catalog.search("tv").await;
        assert_eq!(catalog.href(), "/?search=tv&page=1");

        catalog.reload().await;
        let seen = catalog.source().seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            [
                (ListingQuery::new(2, "phone"), 12),
                (ListingQuery::new(3, "phone"), 12),
                (ListingQuery::new(1, "tv"), 12),
                (ListingQuery::new(1, "tv"), 12),
            ]
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_loading_then_loaded() {
        let source = GatedSource::default();
        let reply = source.gate(1);
        let catalog = Catalog::new(source, Notifier::default(), 12);
        let mut rx = catalog.subscribe();

        let ((), applied) = tokio::join!(
            async {
                rx.changed().await.unwrap();
                assert!(rx.borrow_and_update().is_loading());
                reply.send(page_of("p1", 1)).unwrap();
                rx.changed().await.unwrap();
                assert_eq!(rx.borrow_and_update().items().len(), 1);
            },
            catalog.load(ListingQuery::default())
        );
        assert!(applied);
    }
}
