//! Repository wiring and application state construction
//!
//! The server runs on the in-memory adapters unless a database URL is
//! configured, in which case the PostgreSQL repositories are used and
//! their schemas initialized on startup.

use std::sync::Arc;
use zaintza_adapters::{
    connect, InMemoryBookingRepository, InMemoryCityRepository, InMemoryPaymentRepository,
    InMemoryProviderRepository, InMemoryReviewRepository, InMemoryServiceRepository,
    InMemoryUserRepository, PostgresBookingRepository, PostgresCityRepository,
    PostgresPaymentRepository, PostgresProviderRepository, PostgresReviewRepository,
    PostgresServiceRepository, PostgresUserRepository,
};
use zaintza_api::AppState;
use zaintza_application::{BookingService, PaymentService, ReviewService};
use zaintza_ports::{
    BookingRepository, CityRepository, PaymentRepository, ProviderRepository, ReviewRepository,
    ServiceRepository, UserRepository,
};
use zaintza_shared_types::DomainResult;

/// Everything the application services need to persist through
pub struct Repositories {
    pub bookings: Arc<dyn BookingRepository>,
    pub providers: Arc<dyn ProviderRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub cities: Arc<dyn CityRepository>,
}

pub fn in_memory_repositories() -> Repositories {
    Repositories {
        bookings: Arc::new(InMemoryBookingRepository::new()),
        providers: Arc::new(InMemoryProviderRepository::new()),
        services: Arc::new(InMemoryServiceRepository::new()),
        users: Arc::new(InMemoryUserRepository::new()),
        reviews: Arc::new(InMemoryReviewRepository::new()),
        payments: Arc::new(InMemoryPaymentRepository::new()),
        cities: Arc::new(InMemoryCityRepository::new()),
    }
}

pub async fn postgres_repositories(url: &str, max_connections: u32) -> DomainResult<Repositories> {
    let pool = connect(url, max_connections).await?;

    let bookings = PostgresBookingRepository::new(pool.clone());
    let providers = PostgresProviderRepository::new(pool.clone());
    let services = PostgresServiceRepository::new(pool.clone());
    let users = PostgresUserRepository::new(pool.clone());
    let reviews = PostgresReviewRepository::new(pool.clone());
    let payments = PostgresPaymentRepository::new(pool.clone());
    let cities = PostgresCityRepository::new(pool);

    bookings.init_schema().await?;
    providers.init_schema().await?;
    services.init_schema().await?;
    users.init_schema().await?;
    reviews.init_schema().await?;
    payments.init_schema().await?;
    cities.init_schema().await?;

    Ok(Repositories {
        bookings: Arc::new(bookings),
        providers: Arc::new(providers),
        services: Arc::new(services),
        users: Arc::new(users),
        reviews: Arc::new(reviews),
        payments: Arc::new(payments),
        cities: Arc::new(cities),
    })
}

pub fn build_state(repos: &Repositories) -> AppState {
    AppState {
        booking_service: Arc::new(BookingService::new(
            repos.bookings.clone(),
            repos.providers.clone(),
            repos.services.clone(),
            repos.users.clone(),
        )),
        review_service: Arc::new(ReviewService::new(
            repos.reviews.clone(),
            repos.bookings.clone(),
            repos.providers.clone(),
        )),
        payment_service: Arc::new(PaymentService::new(
            repos.payments.clone(),
            repos.bookings.clone(),
        )),
        providers: repos.providers.clone(),
        services: repos.services.clone(),
        cities: repos.cities.clone(),
    }
}
