//! Review Repository Port

use async_trait::async_trait;
use zaintza_core::Review;
use zaintza_shared_types::{BookingId, DomainResult, ProviderId, ReviewId};

/// Review persistence port
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review
    ///
    /// # Errors
    /// Returns `DomainError::DuplicateReview` when the booking already
    /// has a review (unique constraint on the booking reference).
    async fn create(&self, review: &Review) -> DomainResult<()>;

    /// Persist changes to an existing review (deactivation)
    async fn update(&self, review: &Review) -> DomainResult<()>;

    async fn find_by_id(&self, id: &ReviewId) -> DomainResult<Option<Review>>;

    /// Is there already a review for this booking?
    async fn exists_for_booking(&self, booking_id: &BookingId) -> DomainResult<bool>;

    /// Active reviews for a provider, newest first
    async fn list_active_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Review>>;
}
