//! Booking lifecycle value objects
//!
//! `BookingState` carries the explicit transition table that every status
//! change in the system goes through. There is no other way to move a
//! booking between states.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Booking state value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingState(String);

impl BookingState {
    pub const PENDING: &'static str = "pending";
    pub const CONFIRMED: &'static str = "confirmed";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";
    pub const REJECTED: &'static str = "rejected";

    pub fn new(state: String) -> Result<Self, DomainError> {
        match state.as_str() {
            Self::PENDING
            | Self::CONFIRMED
            | Self::IN_PROGRESS
            | Self::COMPLETED
            | Self::CANCELLED
            | Self::REJECTED => Ok(Self(state)),
            _ => Err(DomainError::Validation(format!(
                "invalid booking state: {}",
                state
            ))),
        }
    }

    pub fn can_transition_to(&self, target: &Self) -> bool {
        match (self.0.as_str(), target.0.as_str()) {
            (Self::PENDING, Self::CONFIRMED) => true,
            (Self::PENDING, Self::REJECTED) => true,
            (Self::PENDING, Self::CANCELLED) => true,
            (Self::CONFIRMED, Self::IN_PROGRESS) => true,
            (Self::CONFIRMED, Self::CANCELLED) => true,
            (Self::IN_PROGRESS, Self::COMPLETED) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::COMPLETED | Self::CANCELLED | Self::REJECTED
        )
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment status of a booking or payment row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::Validation(format!(
                "invalid payment status: {}",
                s
            ))),
        }
    }
}

/// Who cancelled a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelActor {
    Client,
    Provider,
    Admin,
}

impl CancelActor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "client" => Ok(Self::Client),
            "provider" => Ok(Self::Provider),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::Validation(format!(
                "invalid cancel actor: {}",
                s
            ))),
        }
    }
}

/// Payment method accepted by the mock gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            _ => Err(DomainError::Validation(format!(
                "invalid payment method: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(s: &str) -> BookingState {
        BookingState::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_booking_state_valid_transitions() {
        assert!(state(BookingState::PENDING).can_transition_to(&state(BookingState::CONFIRMED)));
        assert!(state(BookingState::PENDING).can_transition_to(&state(BookingState::REJECTED)));
        assert!(state(BookingState::PENDING).can_transition_to(&state(BookingState::CANCELLED)));
        assert!(
            state(BookingState::CONFIRMED).can_transition_to(&state(BookingState::IN_PROGRESS))
        );
        assert!(state(BookingState::CONFIRMED).can_transition_to(&state(BookingState::CANCELLED)));
        assert!(
            state(BookingState::IN_PROGRESS).can_transition_to(&state(BookingState::COMPLETED))
        );
    }

    #[test]
    fn test_booking_state_invalid_transitions() {
        assert!(!state(BookingState::PENDING).can_transition_to(&state(BookingState::IN_PROGRESS)));
        assert!(!state(BookingState::PENDING).can_transition_to(&state(BookingState::COMPLETED)));
        assert!(!state(BookingState::CONFIRMED).can_transition_to(&state(BookingState::REJECTED)));
        assert!(
            !state(BookingState::IN_PROGRESS).can_transition_to(&state(BookingState::CANCELLED))
        );
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        let all = [
            BookingState::PENDING,
            BookingState::CONFIRMED,
            BookingState::IN_PROGRESS,
            BookingState::COMPLETED,
            BookingState::CANCELLED,
            BookingState::REJECTED,
        ];
        for terminal in [
            BookingState::COMPLETED,
            BookingState::CANCELLED,
            BookingState::REJECTED,
        ] {
            assert!(state(terminal).is_terminal());
            for target in &all {
                assert!(!state(terminal).can_transition_to(&state(target)));
            }
        }
    }

    #[test]
    fn test_invalid_state_rejected() {
        assert!(BookingState::new("archived".to_string()).is_err());
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(PaymentStatus::parse("settled").is_err());
    }

    #[test]
    fn test_cancel_actor_roundtrip() {
        for actor in [CancelActor::Client, CancelActor::Provider, CancelActor::Admin] {
            assert_eq!(CancelActor::parse(actor.as_str()).unwrap(), actor);
        }
    }
}
