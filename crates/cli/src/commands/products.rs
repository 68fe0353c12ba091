//! Catalog browsing.
//!
//! # Usage
//!
//! ```bash
//! bazaar products list --search phone --page 2
//! bazaar products list --link 'https://shop.example/?search=phone&page=2'
//! bazaar products show <ID> --add 2
//! ```

use std::cell::Cell;
use std::rc::Rc;

use clap::{Args, Subcommand};

use bazaar_core::ProductId;
use bazaar_storefront::models::{ListingQuery, ListingState};
use bazaar_storefront::services::{ProductPage, ReturnMarker, ScrollCoordinator};
use bazaar_storefront::{AppState, StorefrontError};

use crate::output::{self, Row};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List a page of products
    List(ListArgs),
    /// Show one product with its reviews
    Show {
        /// Product ID
        id: String,

        /// Add this many units to the cart (limited by stock)
        #[arg(long, default_value_t = 0)]
        add: u32,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Search term; a new search starts at page 1 unless --page is given
    #[arg(short, long)]
    search: Option<String>,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Shared listing link (`/?search=..&page=..`); overrides --search/--page
    #[arg(long, conflicts_with_all = ["search", "page"])]
    link: Option<String>,

    /// Highlight the row of the product you came back from
    #[arg(long)]
    from: Option<String>,
}

pub async fn run(state: &AppState, action: ProductsAction) -> Result<(), StorefrontError> {
    match action {
        ProductsAction::List(args) => list(state, args).await,
        ProductsAction::Show { id, add } => show(state, &ProductId::new(id), add).await,
    }
}

/// The query part of a link, whether absolute (`https://..?q`) or relative
/// (`/?q`, `?q`).
fn query_of(link: &str) -> &str {
    link.split_once('?').map_or("", |(_, query)| query)
}

async fn list(state: &AppState, args: ListArgs) -> Result<(), StorefrontError> {
    let query = match &args.link {
        Some(link) => ListingQuery::from_query_str(query_of(link)),
        None => ListingQuery::new(args.page, args.search.unwrap_or_default()),
    };

    let catalog = state.catalog();
    catalog.load(query).await;
    let listing = catalog.snapshot();

    if matches!(listing.state(), ListingState::Failed) {
        return Err(StorefrontError::NotFound("Products".to_string()));
    }

    // Register a handle per rendered row so a return marker can find it.
    let focus = Rc::new(Cell::new(None));
    let mut rows = ScrollCoordinator::new();
    for (i, product) in listing.items().iter().enumerate() {
        rows.mount(product.id.clone(), Row::new(i, Rc::clone(&focus)));
    }
    let mut marker = args.from.map(|id| ReturnMarker::new(ProductId::new(id)));
    if marker.is_some() && !rows.restore(&mut marker) {
        tracing::debug!("Return target is not on this page");
    }

    output::line(format!("Showing {}", catalog.href()));
    output::product_rows(listing.items(), focus.get());
    if let (Some(pagination), Some(query)) = (listing.pagination(), listing.query()) {
        output::pager(pagination, query.search());
    }
    Ok(())
}

async fn show(state: &AppState, id: &ProductId, add: u32) -> Result<(), StorefrontError> {
    let mut page = ProductPage::load(state.api(), id, state.notifier().clone()).await?;

    for _ in 0..add {
        if page.add_to_cart(state.cart()).is_err() {
            break;
        }
    }

    output::product_detail(page.product(), page.local_stock());
    output::line("");
    output::line("Reviews:");
    output::reviews(page.reviews().reviews());
    output::line("");
    output::line(format!(
        "Back to the listing at this product: bazaar products list --from {id}"
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_of_link_forms() {
        assert_eq!(query_of("https://shop.example/?search=phone&page=2"), "search=phone&page=2");
        assert_eq!(query_of("/?search=phone&page=2"), "search=phone&page=2");
        assert_eq!(query_of("?page=3"), "page=3");
        assert_eq!(query_of("/"), "");
    }
}
