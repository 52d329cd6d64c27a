//! Booking Repository Port

use async_trait::async_trait;
use zaintza_core::Booking;
use zaintza_shared_types::{BookingId, DomainResult, ProviderId, UserId};

/// Booking persistence port
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking
    ///
    /// # Errors
    /// Returns `DomainError::DuplicateBookingNumber` when the booking
    /// number is already taken (the caller regenerates and retries).
    async fn create(&self, booking: &Booking) -> DomainResult<()>;

    /// Persist changes to an existing booking
    async fn update(&self, booking: &Booking) -> DomainResult<()>;

    /// Get a booking by id
    async fn find_by_id(&self, id: &BookingId) -> DomainResult<Option<Booking>>;

    /// Get the booking matching (booking, client, provider), for review
    /// eligibility checks
    async fn find_for_review(
        &self,
        booking_id: &BookingId,
        client_id: &UserId,
        provider_id: &ProviderId,
    ) -> DomainResult<Option<Booking>>;

    /// All bookings created by a client, newest first
    async fn list_by_client(&self, client_id: &UserId) -> DomainResult<Vec<Booking>>;

    /// All bookings assigned to a provider, newest first
    async fn list_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Booking>>;
}
