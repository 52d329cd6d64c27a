//! Zaintza Core Domain
//!
//! Domain entities for the care-services marketplace: the booking
//! aggregate and its state machine, pricing/commission computation,
//! provider profiles with the review aggregate, and the supporting
//! catalogue (services, cities, users).

pub mod booking;
pub mod city;
pub mod payment;
pub mod pricing;
pub mod provider;
pub mod review;
pub mod service;
pub mod user;

pub use booking::{Booking, BookingDetails};
pub use city::{haversine_km, nearest_city, City};
pub use payment::Payment;
pub use pricing::Quote;
pub use provider::{Provider, ProviderAvailability, ProviderService};
pub use review::Review;
pub use service::{Service, ServiceCategory};
pub use user::{User, UserRole};

pub use zaintza_shared_types::{DomainError, DomainResult};

/// Crate-local result alias
pub type Result<T> = DomainResult<T>;
