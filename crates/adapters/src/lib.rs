//! Zaintza Adapters
//!
//! Persistence implementations of the repository ports (in-memory and
//! PostgreSQL) and the unified application configuration.

pub mod config;
pub mod memory;
pub mod postgres;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use memory::{
    InMemoryBookingRepository, InMemoryCityRepository, InMemoryPaymentRepository,
    InMemoryProviderRepository, InMemoryReviewRepository, InMemoryServiceRepository,
    InMemoryUserRepository,
};
pub use postgres::{
    connect, PostgresBookingRepository, PostgresCityRepository, PostgresPaymentRepository,
    PostgresProviderRepository, PostgresReviewRepository, PostgresServiceRepository,
    PostgresUserRepository,
};
