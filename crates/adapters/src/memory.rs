//! In-Memory Repository Implementations
//!
//! Default persistence for development and tests. Each repository keeps
//! its rows in a `HashMap` behind a `tokio::sync::RwLock`; counter and
//! aggregate updates hold the write lock across the whole
//! read-modify-write, which makes them atomic here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use zaintza_core::{
    Booking, City, Payment, Provider, ProviderAvailability, ProviderService, Review, Service,
    ServiceCategory, User,
};
use zaintza_ports::{
    BookingRepository, CityRepository, PaymentRepository, ProviderFilter, ProviderRepository,
    ReviewRepository, ServiceRepository, UserRepository,
};
use zaintza_shared_types::{
    BookingId, CategoryId, CityId, DomainError, DomainResult, PaymentId, ProviderId, ReviewId,
    ServiceId, UserId,
};

/// In-memory booking repository
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: &Booking) -> DomainResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings
            .values()
            .any(|b| b.booking_number == booking.booking_number)
        {
            return Err(DomainError::DuplicateBookingNumber(
                booking.booking_number.to_string(),
            ));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> DomainResult<()> {
        let mut bookings = self.bookings.write().await;
        if !bookings.contains_key(&booking.id) {
            return Err(DomainError::NotFound(format!("booking {}", booking.id)));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn find_for_review(
        &self,
        booking_id: &BookingId,
        client_id: &UserId,
        provider_id: &ProviderId,
    ) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(booking_id).cloned().filter(|b| {
            b.details.client_id == *client_id && b.details.provider_id == *provider_id
        }))
    }

    async fn list_by_client(&self, client_id: &UserId) -> DomainResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut out: Vec<Booking> = bookings
            .values()
            .filter(|b| b.details.client_id == *client_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut out: Vec<Booking> = bookings
            .values()
            .filter(|b| b.details.provider_id == *provider_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

/// In-memory provider repository, including availability windows and
/// per-service rate overrides
#[derive(Default)]
pub struct InMemoryProviderRepository {
    providers: Arc<RwLock<HashMap<ProviderId, Provider>>>,
    availability: Arc<RwLock<Vec<ProviderAvailability>>>,
    provider_services: Arc<RwLock<Vec<ProviderService>>>,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_availability(&self, slot: ProviderAvailability) {
        self.availability.write().await.push(slot);
    }

    pub async fn add_provider_service(&self, link: ProviderService) {
        self.provider_services.write().await.push(link);
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn save(&self, provider: &Provider) -> DomainResult<()> {
        self.providers
            .write()
            .await
            .insert(provider.id, provider.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProviderId) -> DomainResult<Option<Provider>> {
        Ok(self.providers.read().await.get(id).cloned())
    }

    async fn search(&self, filter: &ProviderFilter) -> DomainResult<Vec<Provider>> {
        let providers = self.providers.read().await;
        let links = self.provider_services.read().await;
        let mut out: Vec<Provider> = providers
            .values()
            .filter(|p| p.is_active)
            .filter(|p| filter.city_id.map_or(true, |city| p.city_id == city))
            .filter(|p| !filter.verified_only || p.is_verified)
            .filter(|p| {
                filter.service_id.map_or(true, |service| {
                    links
                        .iter()
                        .any(|l| l.provider_id == p.id && l.service_id == service && l.is_active)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(out)
    }

    async fn increment_total_bookings(&self, id: &ProviderId) -> DomainResult<()> {
        let mut providers = self.providers.write().await;
        let provider = providers
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("provider {}", id)))?;
        provider.record_booking();
        Ok(())
    }

    async fn apply_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()> {
        let mut providers = self.providers.write().await;
        let provider = providers
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("provider {}", id)))?;
        provider.apply_review(rating)
    }

    async fn retract_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()> {
        let mut providers = self.providers.write().await;
        let provider = providers
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("provider {}", id)))?;
        provider.retract_review(rating)
    }

    async fn list_availability(&self, id: &ProviderId) -> DomainResult<Vec<ProviderAvailability>> {
        Ok(self
            .availability
            .read()
            .await
            .iter()
            .filter(|s| s.provider_id == *id)
            .cloned()
            .collect())
    }

    async fn custom_rate_for(
        &self,
        id: &ProviderId,
        service_id: &ServiceId,
    ) -> DomainResult<Option<f64>> {
        Ok(self
            .provider_services
            .read()
            .await
            .iter()
            .find(|l| l.provider_id == *id && l.service_id == *service_id && l.is_active)
            .and_then(|l| l.custom_rate))
    }
}

/// In-memory service catalogue repository
#[derive(Default)]
pub struct InMemoryServiceRepository {
    services: Arc<RwLock<HashMap<ServiceId, Service>>>,
    categories: Arc<RwLock<HashMap<CategoryId, ServiceCategory>>>,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn save(&self, service: &Service) -> DomainResult<()> {
        self.services
            .write()
            .await
            .insert(service.id, service.clone());
        Ok(())
    }

    async fn save_category(&self, category: &ServiceCategory) -> DomainResult<()> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ServiceId) -> DomainResult<Option<Service>> {
        Ok(self.services.read().await.get(id).cloned())
    }

    async fn list(&self, category_id: Option<&CategoryId>) -> DomainResult<Vec<Service>> {
        let services = self.services.read().await;
        let mut out: Vec<Service> = services
            .values()
            .filter(|s| s.is_active)
            .filter(|s| category_id.map_or(true, |c| s.category_id == *c))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn list_categories(&self) -> DomainResult<Vec<ServiceCategory>> {
        let categories = self.categories.read().await;
        let mut out: Vec<ServiceCategory> =
            categories.values().filter(|c| c.is_active).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

/// In-memory review repository
#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<ReviewId, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, review: &Review) -> DomainResult<()> {
        let mut reviews = self.reviews.write().await;
        if reviews.values().any(|r| r.booking_id == review.booking_id) {
            return Err(DomainError::DuplicateReview(review.booking_id.to_string()));
        }
        reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> DomainResult<()> {
        let mut reviews = self.reviews.write().await;
        if !reviews.contains_key(&review.id) {
            return Err(DomainError::NotFound(format!("review {}", review.id)));
        }
        reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> DomainResult<Option<Review>> {
        Ok(self.reviews.read().await.get(id).cloned())
    }

    async fn exists_for_booking(&self, booking_id: &BookingId) -> DomainResult<bool> {
        Ok(self
            .reviews
            .read()
            .await
            .values()
            .any(|r| r.booking_id == *booking_id))
    }

    async fn list_active_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut out: Vec<Review> = reviews
            .values()
            .filter(|r| r.provider_id == *provider_id && r.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

/// In-memory payment repository
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: &Payment) -> DomainResult<()> {
        let mut payments = self.payments.write().await;
        if payments.values().any(|p| p.booking_id == payment.booking_id) {
            return Err(DomainError::Validation(format!(
                "booking {} already has a payment",
                payment.booking_id
            )));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: &BookingId) -> DomainResult<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .values()
            .find(|p| p.booking_id == *booking_id)
            .cloned())
    }
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> DomainResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> DomainResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

/// In-memory city repository
#[derive(Default)]
pub struct InMemoryCityRepository {
    cities: Arc<RwLock<HashMap<CityId, City>>>,
}

impl InMemoryCityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CityRepository for InMemoryCityRepository {
    async fn save(&self, city: &City) -> DomainResult<()> {
        self.cities.write().await.insert(city.id, city.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CityId) -> DomainResult<Option<City>> {
        Ok(self.cities.read().await.get(id).cloned())
    }

    async fn list_active(&self) -> DomainResult<Vec<City>> {
        let cities = self.cities.read().await;
        let mut out: Vec<City> = cities.values().filter(|c| c.is_active).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use zaintza_core::{BookingDetails, Quote};
    use zaintza_shared_types::BookingNumber;

    fn booking_with_number(number: BookingNumber) -> Booking {
        Booking::new(
            BookingId::new(),
            number,
            BookingDetails {
                client_id: UserId::new(),
                provider_id: ProviderId::new(),
                service_id: ServiceId::new(),
                city_id: CityId::new(),
                scheduled_at: Utc::now() + Duration::days(1),
                duration_hours: 2,
                address: "Gran Via 45, 2A, Bilbao".to_string(),
                notes: None,
            },
            Quote::new(500.0, 10.0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_booking_number_collision_detected() {
        let repo = InMemoryBookingRepository::new();
        let number = BookingNumber::generate(Utc::now());

        repo.create(&booking_with_number(number.clone())).await.unwrap();
        let result = repo.create(&booking_with_number(number)).await;
        assert!(matches!(
            result,
            Err(DomainError::DuplicateBookingNumber(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_review_rejected() {
        let repo = InMemoryReviewRepository::new();
        let booking_id = BookingId::new();
        let review = |rating| {
            Review::new(
                ReviewId::new(),
                booking_id,
                UserId::new(),
                ProviderId::new(),
                rating,
                None,
                None,
            )
            .unwrap()
        };

        repo.create(&review(5)).await.unwrap();
        let result = repo.create(&review(4)).await;
        assert!(matches!(result, Err(DomainError::DuplicateReview(_))));
    }

    #[tokio::test]
    async fn test_update_missing_booking_is_not_found() {
        let repo = InMemoryBookingRepository::new();
        let booking = booking_with_number(BookingNumber::generate(Utc::now()));
        assert!(matches!(
            repo.update(&booking).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
