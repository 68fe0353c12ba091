//! Review submission with inline validation.

use tracing::instrument;

use bazaar_core::{ProductId, Rating, Review};

use crate::api::{ApiClient, NewReview};
use crate::error::{StorefrontError, ValidationError};
use crate::notify::Notifier;
use crate::services::session::AuthSession;

const REVIEW_ADDED: &str = "Review added successfully!";
const REVIEW_FAILED: &str = "Failed to submit review";

/// A review as typed into the form. A rating of 0 means no star was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub name: String,
    pub comment: String,
    pub rating: u8,
}

impl ReviewDraft {
    /// Check the draft and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank name or comment, or a rating
    /// outside 1..=5.
    pub fn validate(&self) -> Result<NewReview, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("Name"));
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ValidationError::MissingField("Comment"));
        }
        Ok(NewReview {
            name: name.to_string(),
            comment: comment.to_string(),
            rating: Rating::new(self.rating)?,
        })
    }
}

/// A product's reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewList {
    product_id: ProductId,
    reviews: Vec<Review>,
}

impl ReviewList {
    #[must_use]
    pub const fn new(product_id: ProductId, reviews: Vec<Review>) -> Self {
        Self {
            product_id,
            reviews,
        }
    }

    /// Fetch the reviews for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch(api: &ApiClient, product_id: &ProductId) -> Result<Self, StorefrontError> {
        let reviews = api.get_reviews(product_id).await?;
        Ok(Self::new(product_id.clone(), reviews))
    }

    /// Validate and post `draft`.
    ///
    /// An invalid draft never reaches the network. On success the created
    /// review goes to the top of the list; on failure the list is untouched.
    ///
    /// # Errors
    ///
    /// Returns the validation or API error after notifying the user.
    #[instrument(skip_all, fields(product = %self.product_id))]
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &AuthSession,
        notifier: &Notifier,
        draft: &ReviewDraft,
    ) -> Result<(), StorefrontError> {
        let body = match draft.validate() {
            Ok(body) => body,
            Err(e) => {
                notifier.error(e.to_string());
                return Err(e.into());
            }
        };

        let token = session.bearer();
        match api.create_review(token.as_ref(), &self.product_id, &body).await {
            Ok(review) => {
                self.reviews.insert(0, review);
                notifier.success(REVIEW_ADDED);
                Ok(())
            }
            Err(e) => {
                let err = StorefrontError::from(e);
                if err.needs_login() {
                    notifier.notify(err.notice());
                } else {
                    tracing::warn!(error = %err, "Review submission failed");
                    notifier.error(REVIEW_FAILED);
                }
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}
