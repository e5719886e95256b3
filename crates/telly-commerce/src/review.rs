//! Product reviews.

use crate::error::CommerceError;
use crate::ids::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A review as posted from the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub product_id: ProductId,
    pub name: String,
    pub rating: u8,
    pub review: String,
}

impl ReviewSubmission {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        rating: u8,
        review: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            rating,
            review: review.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CommerceError::InvalidReview(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        if self.name.trim().is_empty() {
            return Err(CommerceError::InvalidReview("name is required".to_string()));
        }
        if self.review.trim().is_empty() {
            return Err(CommerceError::InvalidReview("review text is required".to_string()));
        }
        Ok(())
    }

    /// Validate and stamp the submission. New reviews await approval.
    pub fn accept(self) -> Result<Review, CommerceError> {
        self.validate()?;
        Ok(Review {
            product_id: self.product_id,
            name: self.name.trim().to_string(),
            rating: self.rating,
            review: self.review.trim().to_string(),
            approved: false,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub product_id: ProductId,
    pub name: String,
    pub rating: u8,
    pub review: String,
    #[serde(default)]
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Rating as filled and empty stars, e.g. `★★★★☆`.
    pub fn stars(&self) -> String {
        let filled = self.rating.min(MAX_RATING) as usize;
        let empty = MAX_RATING as usize - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

/// Mean rating across reviews, `None` when there are none.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(sum) / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        ReviewSubmission::new("bk-01", "Ana", rating, "Fits great")
            .accept()
            .unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(ReviewSubmission::new("bk-01", "Ana", 0, "x").validate().is_err());
        assert!(ReviewSubmission::new("bk-01", "Ana", 6, "x").validate().is_err());
        assert!(ReviewSubmission::new("bk-01", "Ana", 5, "x").validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(ReviewSubmission::new("bk-01", " ", 4, "x").validate().is_err());
        assert!(ReviewSubmission::new("bk-01", "Ana", 4, "").validate().is_err());
    }

    #[test]
    fn test_accepted_review_awaits_approval() {
        let r = review(4);
        assert!(!r.approved);
        assert_eq!(r.review, "Fits great");
    }

    #[test]
    fn test_stars() {
        assert_eq!(review(3).stars(), "★★★☆☆");
        assert_eq!(review(5).stars(), "★★★★★");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[review(4), review(5)]), Some(4.5));
    }
}
