//! HTTP Routes
//!
//! Defines the API routes for the application

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{self, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/v1/bookings",
            post(handlers::create_booking).get(handlers::list_bookings),
        )
        .route("/api/v1/bookings/{id}", get(handlers::get_booking))
        .route("/api/v1/bookings/{id}/cancel", post(handlers::cancel_booking))
        .route(
            "/api/v1/bookings/{id}/confirm",
            post(handlers::confirm_booking),
        )
        .route(
            "/api/v1/bookings/{id}/reject",
            post(handlers::reject_booking),
        )
        .route("/api/v1/bookings/{id}/start", post(handlers::start_booking))
        .route(
            "/api/v1/bookings/{id}/complete",
            post(handlers::complete_booking),
        )
        .route(
            "/api/v1/bookings/{id}/payment",
            post(handlers::record_payment),
        )
        .route("/api/v1/reviews", post(handlers::create_review))
        .route(
            "/api/v1/reviews/{id}/deactivate",
            post(handlers::deactivate_review),
        )
        .route("/api/v1/providers", get(handlers::search_providers))
        .route("/api/v1/providers/{id}", get(handlers::get_provider))
        .route(
            "/api/v1/providers/{id}/reviews",
            get(handlers::provider_reviews),
        )
        .route("/api/v1/categories", get(handlers::list_categories))
        .route("/api/v1/services", get(handlers::list_services))
        .route("/api/v1/cities", get(handlers::list_cities))
        .route("/api/v1/cities/nearest", get(handlers::nearest_city_handler))
        .with_state(state)
}
