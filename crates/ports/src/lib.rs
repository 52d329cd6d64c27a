//! Zaintza Ports
//!
//! Repository interfaces between the application services and the
//! persistence adapters. All ports return `DomainResult` and are object
//! safe so services can hold them as `Arc<dyn ...>`.

pub mod booking_repository;
pub mod city_repository;
pub mod payment_repository;
pub mod provider_repository;
pub mod review_repository;
pub mod service_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use city_repository::CityRepository;
pub use payment_repository::PaymentRepository;
pub use provider_repository::{ProviderFilter, ProviderRepository};
pub use review_repository::ReviewRepository;
pub use service_repository::ServiceRepository;
pub use user_repository::UserRepository;
