//! Shared types and definitions for the Zaintza care-services marketplace
//!
//! This crate contains common ids, value objects, and error types used
//! across all bounded contexts in the system.

pub mod booking_number;
pub mod booking_states;
pub mod error;
pub mod ids;

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;

// Re-export all types for easy importing
pub use crate::booking_number::BookingNumber;
pub use crate::booking_states::{BookingState, CancelActor, PaymentMethod, PaymentStatus};
pub use crate::error::{DomainError, DomainResult};
pub use crate::ids::{
    BookingId, CategoryId, CityId, PaymentId, ProviderId, ReviewId, ServiceId, UserId,
};
