//! Booking aggregate root
//!
//! Encapsulates the booking lifecycle and keeps state transitions
//! consistent: every status change goes through the transition table on
//! `BookingState`, and the amount fields always satisfy
//! `provider_amount = total_amount - commission_amount`.

use crate::pricing::{round2, Quote};
use crate::Result;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::{
    BookingId, BookingNumber, BookingState, CancelActor, CityId, DomainError, PaymentStatus,
    ProviderId, ServiceId, UserId,
};

const MIN_ADDRESS_LEN: usize = 10;
const MAX_DURATION_HOURS: u32 = 24;

/// What the client asked for (immutable value object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub client_id: UserId,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub city_id: CityId,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub duration_hours: u32,
    pub address: String,
    pub notes: Option<String>,
}

impl BookingDetails {
    /// # Errors
    /// Returns `DomainError::Validation` if the schedule, duration, or
    /// address do not meet the booking rules.
    pub fn validate(&self) -> Result<()> {
        if self.scheduled_at <= chrono::Utc::now() {
            return Err(DomainError::Validation(
                "scheduled date must be in the future".to_string(),
            ));
        }
        if self.duration_hours < 1 || self.duration_hours > MAX_DURATION_HOURS {
            return Err(DomainError::Validation(format!(
                "duration must be between 1 and {} hours",
                MAX_DURATION_HOURS
            )));
        }
        if self.address.trim().len() < MIN_ADDRESS_LEN {
            return Err(DomainError::Validation(format!(
                "address must be at least {} characters",
                MIN_ADDRESS_LEN
            )));
        }
        Ok(())
    }
}

/// Booking aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub booking_number: BookingNumber,
    pub details: BookingDetails,
    pub status: BookingState,
    pub total_amount: f64,
    pub commission_amount: f64,
    pub provider_amount: f64,
    pub payment_status: PaymentStatus,
    pub cancelled_by: Option<CancelActor>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_start: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_end: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_duration_hours: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Booking {
    /// Create a new booking in `pending` state with payment `pending`
    ///
    /// # Errors
    /// Returns `DomainError::Validation` if the details are invalid
    pub fn new(
        id: BookingId,
        booking_number: BookingNumber,
        details: BookingDetails,
        quote: Quote,
    ) -> Result<Self> {
        details.validate()?;

        let now = chrono::Utc::now();
        Ok(Self {
            id,
            booking_number,
            details,
            status: BookingState::new(BookingState::PENDING.to_string())?,
            total_amount: quote.total_amount,
            commission_amount: quote.commission_amount,
            provider_amount: quote.provider_amount,
            payment_status: PaymentStatus::Pending,
            cancelled_by: None,
            cancellation_reason: None,
            cancelled_at: None,
            actual_start: None,
            actual_end: None,
            actual_duration_hours: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the amount fields, keeping the payout split consistent
    pub fn set_amounts(&mut self, quote: Quote) {
        self.total_amount = quote.total_amount;
        self.commission_amount = quote.commission_amount;
        self.provider_amount = quote.provider_amount;
        self.updated_at = chrono::Utc::now();
    }

    /// Transition to `confirmed` (provider accepted)
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if transition is invalid
    pub fn confirm(&mut self) -> Result<()> {
        self.transition_to(BookingState::CONFIRMED)
    }

    /// Transition to `rejected` (terminal, provider declined)
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if transition is invalid
    pub fn reject(&mut self) -> Result<()> {
        self.transition_to(BookingState::REJECTED)
    }

    /// Transition to `in_progress` and record the actual start time
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if transition is invalid
    pub fn start(&mut self) -> Result<()> {
        self.transition_to(BookingState::IN_PROGRESS)?;
        self.actual_start = Some(chrono::Utc::now());
        Ok(())
    }

    /// Transition to `completed` (terminal) and record the actual end time
    /// and worked duration
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if transition is invalid
    pub fn complete(&mut self) -> Result<()> {
        self.transition_to(BookingState::COMPLETED)?;
        let now = chrono::Utc::now();
        self.actual_end = Some(now);
        self.actual_duration_hours = Some(match self.actual_start {
            Some(start) => round2((now - start).num_minutes() as f64 / 60.0),
            None => self.details.duration_hours as f64,
        });
        Ok(())
    }

    /// Cancel the booking, recording who did it and why
    ///
    /// # Errors
    /// Returns `DomainError::AlreadyCancelled` if the booking is already
    /// cancelled, and `DomainError::CannotCancel` if the current state has
    /// no cancellation edge (completed, in progress, rejected).
    pub fn cancel(&mut self, actor: CancelActor, reason: Option<String>) -> Result<()> {
        if self.status.as_str() == BookingState::CANCELLED {
            return Err(DomainError::AlreadyCancelled(
                self.booking_number.to_string(),
            ));
        }

        let target = BookingState::new(BookingState::CANCELLED.to_string())?;
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::CannotCancel(self.status.as_str().to_string()));
        }

        let now = chrono::Utc::now();
        self.status = target;
        self.cancelled_by = Some(actor);
        self.cancellation_reason = reason;
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Mark the booking as paid
    pub fn mark_paid(&mut self) {
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = chrono::Utc::now();
    }

    /// Check if booking is in `pending` state
    pub fn is_pending(&self) -> bool {
        self.status.as_str() == BookingState::PENDING
    }

    /// Check if booking is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition_to(&mut self, target: &str) -> Result<()> {
        let new_state = BookingState::new(target.to_string())?;

        if !self.status.can_transition_to(&new_state) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: new_state.as_str().to_string(),
            });
        }

        self.status = new_state;
        self.updated_at = chrono::Utc::now();
        Ok(())
    }
}
