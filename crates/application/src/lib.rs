//! Zaintza Application Services
//!
//! The booking engine, review aggregator, and payment recording,
//! orchestrating the domain entities over the repository ports.

pub mod booking_service;
pub mod payment_service;
pub mod review_service;

pub use booking_service::{BookingService, CreateBookingInput};
pub use payment_service::PaymentService;
pub use review_service::{CreateReviewInput, ReviewService};
