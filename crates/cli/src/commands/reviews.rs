//! Review commands.

use clap::Subcommand;

use bazaar_core::ProductId;
use bazaar_storefront::services::{ReviewDraft, ReviewList};
use bazaar_storefront::{AppState, StorefrontError};

use crate::output;

#[derive(Subcommand)]
pub enum ReviewsAction {
    /// List a product's reviews, newest first
    List {
        /// Product ID
        id: String,
    },
    /// Post a review (requires login)
    Add {
        /// Product ID
        id: String,

        /// Your name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Review text
        #[arg(short, long, default_value = "")]
        comment: String,

        /// Stars, 1 to 5
        #[arg(short, long, default_value_t = 0)]
        rating: u8,
    },
}

pub async fn run(state: &AppState, action: ReviewsAction) -> Result<(), StorefrontError> {
    match action {
        ReviewsAction::List { id } => {
            let list = ReviewList::fetch(state.api(), &ProductId::new(id)).await?;
            output::reviews(list.reviews());
        }
        ReviewsAction::Add {
            id,
            name,
            comment,
            rating,
        } => {
            let draft = ReviewDraft {
                name,
                comment,
                rating,
            };
            // Validate before fetching anything, so a bad draft costs no requests.
            if let Err(e) = draft.validate() {
                state.notifier().error(e.to_string());
                return Err(e.into());
            }

            let mut list = ReviewList::fetch(state.api(), &ProductId::new(id)).await?;
            list.submit(state.api(), state.session(), state.notifier(), &draft)
                .await?;
            output::reviews(list.reviews());
        }
    }
    Ok(())
}
