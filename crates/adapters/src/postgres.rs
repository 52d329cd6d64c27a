//! PostgreSQL Repository Implementations
//!
//! Production persistence. Schemas are created on startup by each
//! repository's `init_schema`; queries are runtime-checked and rows are
//! mapped by hand.

pub mod booking_repository;
pub mod catalog_repository;
pub mod city_repository;
pub mod payment_repository;
pub mod provider_repository;
pub mod review_repository;
pub mod user_repository;

pub use booking_repository::PostgresBookingRepository;
pub use catalog_repository::PostgresServiceRepository;
pub use city_repository::PostgresCityRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use provider_repository::PostgresProviderRepository;
pub use review_repository::PostgresReviewRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use zaintza_shared_types::{DomainError, DomainResult};

/// Open a connection pool against the configured database
pub async fn connect(url: &str, max_connections: u32) -> DomainResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to connect to database: {}", e)))?;
    info!(max_connections, "database pool ready");
    Ok(pool)
}

/// True when the error is a unique-constraint violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
