//! Application Service for Payment Recording
//!
//! There is no gateway integration: a payment is recorded synchronously
//! as completed and the booking flips to `paid` in the same operation.

use std::sync::Arc;
use tracing::info;
use zaintza_core::Payment;
use zaintza_ports::{BookingRepository, PaymentRepository};
use zaintza_shared_types::{
    BookingId, BookingState, DomainError, DomainResult, PaymentId, PaymentMethod,
};

pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { payments, bookings }
    }

    /// Record a completed payment for a booking's total amount
    ///
    /// # Errors
    /// - `DomainError::NotFound` for an unknown booking
    /// - `DomainError::Validation` when the booking already has a payment
    ///   or was cancelled/rejected
    pub async fn record_payment(
        &self,
        booking_id: &BookingId,
        method: PaymentMethod,
    ) -> DomainResult<Payment> {
        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("booking {}", booking_id)))?;

        if matches!(
            booking.status.as_str(),
            BookingState::CANCELLED | BookingState::REJECTED
        ) {
            return Err(DomainError::Validation(format!(
                "cannot pay a {} booking",
                booking.status
            )));
        }

        if self.payments.find_by_booking(booking_id).await?.is_some() {
            return Err(DomainError::Validation(format!(
                "booking {} already has a payment",
                booking_id
            )));
        }

        let payment = Payment::completed(
            PaymentId::new(),
            *booking_id,
            booking.total_amount,
            method,
        );
        self.payments.create(&payment).await?;

        booking.mark_paid();
        self.bookings.update(&booking).await?;

        info!(
            booking_number = %booking.booking_number,
            transaction = %payment.transaction_id,
            amount = payment.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    pub async fn payment_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> DomainResult<Option<Payment>> {
        self.payments.find_by_booking(booking_id).await
    }
}
