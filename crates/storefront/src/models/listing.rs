//! Product listing query, results, and the listing state machine.
//!
//! The `(page, search)` pair is the single source of truth for what the
//! listing shows and is mirrored to the navigable URL as
//! `/?search=<term>&page=<n>`. [`Listing`] tracks which query is current and
//! drops results for queries that were superseded while in flight.

use url::form_urlencoded;

use bazaar_core::Product;

/// What the listing is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingQuery {
    page: u32,
    search: String,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl ListingQuery {
    /// Build a query. Pages below 1 are raised to 1.
    #[must_use]
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
        }
    }

    /// A fresh search always starts from page 1.
    #[must_use]
    pub fn search_for(term: impl Into<String>) -> Self {
        Self::new(1, term)
    }

    /// Same search term, different page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self::new(page, self.search.clone())
    }

    /// Parse from a URL query string such as `search=phone&page=2`.
    ///
    /// A leading `?` is accepted. Missing, non-numeric, or sub-1 pages fall
    /// back to 1; a missing search falls back to the empty string.
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    parsed.page = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(|p| u32::try_from(p).ok())
                        .filter(|&p| p >= 1)
                        .unwrap_or(1);
                }
                "search" => parsed.search = value.into_owned(),
                _ => {}
            }
        }
        parsed
    }

    /// Parse from a full URL, e.g. a shared link.
    #[must_use]
    pub fn from_url(url: &url::Url) -> Self {
        Self::from_query_str(url.query().unwrap_or_default())
    }

    /// Query string form, e.g. `search=phone&page=2`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("search", &self.search)
            .append_pair("page", &self.page.to_string())
            .finish()
    }

    /// Navigable location for this query, e.g. `/?search=phone&page=2`.
    #[must_use]
    pub fn href(&self) -> String {
        format!("/?{}", self.to_query_string())
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }
}

/// One fetched page of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResult {
    pub items: Vec<Product>,
    page_count: u32,
}

impl ListingResult {
    /// `page_count` is raised to at least 1 (an empty catalog still has one
    /// empty page).
    #[must_use]
    pub fn new(items: Vec<Product>, page_count: u32) -> Self {
        Self {
            items,
            page_count: page_count.max(1),
        }
    }

    #[must_use]
    pub const fn page_count(&self) -> u32 {
        self.page_count
    }
}

/// Where the listing is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch for the current query is in flight. Previous items are gone.
    Loading,
    /// The current query's results.
    Loaded(ListingResult),
    /// The current query's fetch failed. Views show an empty/error state.
    Failed,
}

/// Identifies one fetch so its completion can be matched to the query that
/// was current when it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: ListingQuery,
}

impl FetchTicket {
    #[must_use]
    pub const fn query(&self) -> &ListingQuery {
        &self.query
    }
}

/// Prev/next targets for the pager, clamped to `[1, page_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_count: u32,
}

impl Pagination {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// `max(page - 1, 1)`.
    #[must_use]
    pub fn prev(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    /// `min(page + 1, page_count)`.
    #[must_use]
    pub fn next(&self) -> u32 {
        self.page.saturating_add(1).min(self.page_count.max(1))
    }
}

/// The listing state machine: `Idle → Loading → Loaded | Failed`, with any
/// state moving back to `Loading` when a new query begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    query: Option<ListingQuery>,
    generation: u64,
    state: ListingState,
}

impl Listing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `query` current and enter `Loading`, discarding shown items.
    pub fn begin(&mut self, query: ListingQuery) -> FetchTicket {
        self.generation += 1;
        self.query = Some(query.clone());
        self.state = ListingState::Loading;
        FetchTicket {
            generation: self.generation,
            query,
        }
    }

    /// Whether `ticket` still belongs to the current query.
    #[must_use]
    pub const fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a successful fetch. Returns `false` (and changes nothing) when
    /// the ticket was superseded.
    pub fn complete(&mut self, ticket: &FetchTicket, result: ListingResult) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = ListingState::Loaded(result);
        true
    }

    /// Record a failed fetch. Returns `false` when the ticket was superseded.
    pub fn fail(&mut self, ticket: &FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = ListingState::Failed;
        true
    }

    #[must_use]
    pub const fn query(&self) -> Option<&ListingQuery> {
        self.query.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> &ListingState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ListingState::Loading)
    }

    /// Items to display; empty unless `Loaded`.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        match &self.state {
            ListingState::Loaded(result) => &result.items,
            _ => &[],
        }
    }

    /// Pager for the loaded page, if any.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        match (&self.state, &self.query) {
            (ListingState::Loaded(result), Some(query)) => Some(Pagination {
                page: query.page(),
                page_count: result.page_count(),
            }),
            _ => None,
        }
    }

    /// Location mirroring the current query (`/` before anything was asked).
    #[must_use]
    pub fn href(&self) -> String {
        self.query
            .as_ref()
            .map_or_else(|| "/".to_string(), ListingQuery::href)
    }
}
