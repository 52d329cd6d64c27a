//! Error types shared across the system

use thiserror::Error;

/// Result alias used by every layer
pub type DomainResult<T> = Result<T, DomainError>;

/// Base error type for the entire system
///
/// Validation-style variants map to 4xx responses at the API layer;
/// `Infrastructure` and `Concurrency` are the only server-side classes.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    #[error("invalid service: {0}")]
    InvalidService(String),

    #[error("booking {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("booking in state {0} cannot be cancelled")]
    CannotCancel(String),

    #[error("invalid booking: {0}")]
    InvalidBooking(String),

    #[error("duplicate review: {0}")]
    DuplicateReview(String),

    #[error("duplicate booking number: {0}")]
    DuplicateBookingNumber(String),

    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn invalid_state_transition(from: &str, to: &str) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::Validation("address too short".to_string());
        assert_eq!(err.to_string(), "validation error: address too short");

        let err = DomainError::invalid_state_transition("completed", "cancelled");
        assert_eq!(
            err.to_string(),
            "invalid state transition from completed to cancelled"
        );

        let err = DomainError::CannotCancel("in_progress".to_string());
        assert!(err.to_string().contains("in_progress"));
    }

    #[test]
    fn test_error_taxonomy_variants() {
        let provider = DomainError::InvalidProvider("not active".to_string());
        let service = DomainError::InvalidService("not active".to_string());
        let review = DomainError::DuplicateReview("BK00000001ABCD".to_string());

        assert!(provider.to_string().contains("invalid provider"));
        assert!(service.to_string().contains("invalid service"));
        assert!(review.to_string().contains("duplicate review"));
    }
}
