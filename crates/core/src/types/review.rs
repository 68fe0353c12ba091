//! Product review entity and star rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, ReviewId};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// No star was selected.
    #[error("select a star rating")]
    Missing,
    /// More stars than the scale allows.
    #[error("rating must be at most {max} stars (got {got})")]
    TooHigh {
        /// Highest allowed rating.
        max: u8,
        /// Rejected value.
        got: u8,
    },
}

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Highest rating on the scale.
    pub const MAX: u8 = 5;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::Missing`] for zero and
    /// [`RatingError::TooHigh`] for values above [`Rating::MAX`].
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        match stars {
            0 => Err(RatingError::Missing),
            s if s > Self::MAX => Err(RatingError::TooHigh {
                max: Self::MAX,
                got: s,
            }),
            s => Ok(Self(s)),
        }
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A customer review of a product, newest first when listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReviewId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub comment: String,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(Rating::new(0), Err(RatingError::Missing));
        assert!(matches!(Rating::new(6), Err(RatingError::TooHigh { .. })));
        assert_eq!(Rating::new(5).unwrap().stars(), 5);
    }

    #[test]
    fn test_deserialize_review() {
        let review: Review = serde_json::from_value(json!({
            "_id": "r1",
            "productId": "p1",
            "name": "Asha",
            "comment": "Great",
            "rating": 4,
            "date": "2025-01-02T03:04:05.000Z"
        }))
        .unwrap();

        assert_eq!(review.rating.stars(), 4);
        assert_eq!(review.product_id, Some(ProductId::new("p1")));
        assert!(review.date.is_some());
    }

    #[test]
    fn test_deserialize_rejects_zero_rating() {
        let result = serde_json::from_value::<Review>(json!({
            "name": "Asha",
            "comment": "Great",
            "rating": 0
        }));
        assert!(result.is_err());
    }
}
