//! Payment Repository Port

use async_trait::async_trait;
use zaintza_core::Payment;
use zaintza_shared_types::{BookingId, DomainResult};

/// Payment persistence port (one payment per booking)
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment
    ///
    /// # Errors
    /// Returns `DomainError::Validation` when the booking already has a
    /// payment.
    async fn create(&self, payment: &Payment) -> DomainResult<()>;

    async fn find_by_booking(&self, booking_id: &BookingId) -> DomainResult<Option<Payment>>;
}
