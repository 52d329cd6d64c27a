//! Review entity
//!
//! One review per completed booking. Deactivated reviews stay on record
//! but are excluded from the provider's rating aggregate.

use crate::Result;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::{BookingId, DomainError, ProviderId, ReviewId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub client_id: UserId,
    pub provider_id: ProviderId,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Review {
    /// # Errors
    /// Returns `DomainError::Validation` for a rating outside 1..=5
    pub fn new(
        id: ReviewId,
        booking_id: BookingId,
        client_id: UserId,
        provider_id: ProviderId,
        rating: u8,
        title: Option<String>,
        comment: Option<String>,
    ) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
        Ok(Self {
            id,
            booking_id,
            client_id,
            provider_id,
            rating,
            title,
            comment,
            is_active: true,
            created_at: chrono::Utc::now(),
        })
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_rating_bounds() {
        for rating in [1, 3, 5] {
            assert!(Review::new(
                ReviewId::new(),
                BookingId::new(),
                UserId::new(),
                ProviderId::new(),
                rating,
                None,
                None,
            )
            .is_ok());
        }
        for rating in [0, 6] {
            assert!(Review::new(
                ReviewId::new(),
                BookingId::new(),
                UserId::new(),
                ProviderId::new(),
                rating,
                None,
                None,
            )
            .is_err());
        }
    }

    #[test]
    fn test_deactivate() {
        let mut review = Review::new(
            ReviewId::new(),
            BookingId::new(),
            UserId::new(),
            ProviderId::new(),
            4,
            Some("Great care".to_string()),
            None,
        )
        .unwrap();
        assert!(review.is_active);
        review.deactivate();
        assert!(!review.is_active);
    }
}
