//! Application Service for the Booking Engine
//!
//! Owns the booking lifecycle: creation (with all preconditions and the
//! commission split), client cancellation, and the provider/admin-driven
//! transitions. Every state change goes through the `Booking` aggregate,
//! so the transition table is enforced on every path.

use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use zaintza_core::{Booking, BookingDetails, Quote};
use zaintza_ports::{BookingRepository, ProviderRepository, ServiceRepository, UserRepository};
use zaintza_shared_types::{
    BookingId, BookingNumber, CancelActor, CityId, DomainError, DomainResult, ProviderId,
    ServiceId, UserId,
};

/// Retry limit for booking-number collisions
const MAX_NUMBER_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub client_id: UserId,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub city_id: CityId,
    pub scheduled_at: chrono::DateTime<Utc>,
    pub duration_hours: u32,
    pub address: String,
    pub notes: Option<String>,
}

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    providers: Arc<dyn ProviderRepository>,
    services: Arc<dyn ServiceRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        providers: Arc<dyn ProviderRepository>,
        services: Arc<dyn ServiceRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            bookings,
            providers,
            services,
            users,
        }
    }

    /// Create a booking in `pending` state
    ///
    /// # Errors
    /// - `DomainError::Validation` for bad input (past schedule, duration,
    ///   address, unknown client, provider unavailable at the slot)
    /// - `DomainError::InvalidProvider` when the provider is missing or inactive
    /// - `DomainError::InvalidService` when the service is missing or inactive
    pub async fn create_booking(&self, input: CreateBookingInput) -> DomainResult<Booking> {
        let client = self
            .users
            .find_by_id(&input.client_id)
            .await?
            .ok_or_else(|| DomainError::Validation("unknown client".to_string()))?;
        if !client.is_active {
            return Err(DomainError::Validation("client is not active".to_string()));
        }

        let provider = self
            .providers
            .find_by_id(&input.provider_id)
            .await?
            .ok_or_else(|| DomainError::InvalidProvider("provider not found".to_string()))?;
        if !provider.is_active {
            return Err(DomainError::InvalidProvider(
                "provider is not active".to_string(),
            ));
        }

        let service = self
            .services
            .find_by_id(&input.service_id)
            .await?
            .ok_or_else(|| DomainError::InvalidService("service not found".to_string()))?;
        if !service.is_active {
            return Err(DomainError::InvalidService(
                "service is not active".to_string(),
            ));
        }

        let slots = self.providers.list_availability(&input.provider_id).await?;
        if !slots.is_empty() {
            let weekday = input.scheduled_at.weekday().num_days_from_monday() as u8;
            let start = input.scheduled_at.time();
            let fits = slots
                .iter()
                .any(|s| s.weekday == weekday && s.covers(start, input.duration_hours));
            if !fits {
                return Err(DomainError::Validation(
                    "provider is not available at the requested time".to_string(),
                ));
            }
        }

        let rate = self
            .providers
            .custom_rate_for(&input.provider_id, &input.service_id)
            .await?
            .unwrap_or(provider.hourly_rate);
        let quote = Quote::for_hours(rate, input.duration_hours, provider.commission_rate)?;

        let details = BookingDetails {
            client_id: input.client_id,
            provider_id: input.provider_id,
            service_id: input.service_id,
            city_id: input.city_id,
            scheduled_at: input.scheduled_at,
            duration_hours: input.duration_hours,
            address: input.address,
            notes: input.notes,
        };

        // A generated number can collide with an existing row; regenerate
        // the random suffix and retry a bounded number of times.
        let mut attempts = 0;
        let booking = loop {
            attempts += 1;
            let booking = Booking::new(
                BookingId::new(),
                BookingNumber::generate(Utc::now()),
                details.clone(),
                quote,
            )?;
            match self.bookings.create(&booking).await {
                Ok(()) => break booking,
                Err(DomainError::DuplicateBookingNumber(number))
                    if attempts < MAX_NUMBER_ATTEMPTS =>
                {
                    warn!(%number, attempts, "booking number collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        };

        self.providers
            .increment_total_bookings(&input.provider_id)
            .await?;

        info!(
            booking_number = %booking.booking_number,
            provider = %input.provider_id,
            total = booking.total_amount,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking on behalf of the owning client
    ///
    /// # Errors
    /// - `DomainError::NotFound` when the booking does not exist or does
    ///   not belong to the client
    /// - `DomainError::AlreadyCancelled` / `DomainError::CannotCancel`
    ///   from the aggregate's cancellation rules
    pub async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        client_id: &UserId,
        reason: Option<String>,
    ) -> DomainResult<Booking> {
        let mut booking = self.get_booking(booking_id).await?;
        // Ownership failures are indistinguishable from missing bookings
        if booking.details.client_id != *client_id {
            return Err(DomainError::NotFound(format!("booking {}", booking_id)));
        }

        booking.cancel(CancelActor::Client, reason)?;
        self.bookings.update(&booking).await?;

        info!(booking_number = %booking.booking_number, "booking cancelled by client");
        Ok(booking)
    }

    /// Provider accepted the booking
    pub async fn confirm_booking(&self, booking_id: &BookingId) -> DomainResult<Booking> {
        self.transition(booking_id, |b| b.confirm()).await
    }

    /// Provider declined the booking
    pub async fn reject_booking(&self, booking_id: &BookingId) -> DomainResult<Booking> {
        self.transition(booking_id, |b| b.reject()).await
    }

    /// Service visit started
    pub async fn start_booking(&self, booking_id: &BookingId) -> DomainResult<Booking> {
        self.transition(booking_id, |b| b.start()).await
    }

    /// Service visit finished
    pub async fn complete_booking(&self, booking_id: &BookingId) -> DomainResult<Booking> {
        self.transition(booking_id, |b| b.complete()).await
    }

    pub async fn get_booking(&self, booking_id: &BookingId) -> DomainResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("booking {}", booking_id)))
    }

    pub async fn list_for_client(&self, client_id: &UserId) -> DomainResult<Vec<Booking>> {
        self.bookings.list_by_client(client_id).await
    }

    pub async fn list_for_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Booking>> {
        self.bookings.list_by_provider(provider_id).await
    }

    async fn transition(
        &self,
        booking_id: &BookingId,
        apply: impl FnOnce(&mut Booking) -> DomainResult<()>,
    ) -> DomainResult<Booking> {
        let mut booking = self.get_booking(booking_id).await?;
        apply(&mut booking)?;
        self.bookings.update(&booking).await?;
        info!(
            booking_number = %booking.booking_number,
            status = %booking.status,
            "booking transitioned"
        );
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicU32, Ordering};
    use zaintza_adapters::{
        InMemoryBookingRepository, InMemoryProviderRepository, InMemoryServiceRepository,
        InMemoryUserRepository,
    };
    use zaintza_core::{Provider, Service, ServiceCategory, User, UserRole};
    use zaintza_shared_types::CategoryId;

    struct Fixture {
        service: BookingService,
        providers: Arc<InMemoryProviderRepository>,
        client_id: UserId,
        provider_id: ProviderId,
        service_id: ServiceId,
        city_id: CityId,
    }

    async fn fixture() -> Fixture {
        fixture_with_bookings(Arc::new(InMemoryBookingRepository::new())).await
    }

    async fn fixture_with_bookings(bookings: Arc<dyn BookingRepository>) -> Fixture {
        let providers = Arc::new(InMemoryProviderRepository::new());
        let services = Arc::new(InMemoryServiceRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());

        let client = User::new(
            UserId::new(),
            "Jon Agirre".to_string(),
            "jon@example.com".to_string(),
            UserRole::Client,
        )
        .unwrap();
        users.save(&client).await.unwrap();

        let city_id = CityId::new();
        let provider = Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Miren Etxebarria".to_string(),
            city_id,
            250.0,
        )
        .unwrap();
        providers.save(&provider).await.unwrap();

        let category = ServiceCategory::new(CategoryId::new(), "Home care".to_string()).unwrap();
        services.save_category(&category).await.unwrap();
        let service_row = Service::new(
            ServiceId::new(),
            category.id,
            "Elderly companionship".to_string(),
            220.0,
        )
        .unwrap();
        services.save(&service_row).await.unwrap();

        Fixture {
            service: BookingService::new(bookings, providers.clone(), services, users),
            providers,
            client_id: client.id,
            provider_id: provider.id,
            service_id: service_row.id,
            city_id,
        }
    }

    fn input(f: &Fixture) -> CreateBookingInput {
        CreateBookingInput {
            client_id: f.client_id,
            provider_id: f.provider_id,
            service_id: f.service_id,
            city_id: f.city_id,
            scheduled_at: Utc::now() + Duration::days(2),
            duration_hours: 8,
            address: "Calle Mayor 12, 3B, Bilbao".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_booking_computes_split() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();

        // 250/h x 8h at the default 10% commission
        assert_eq!(booking.total_amount, 2000.0);
        assert_eq!(booking.commission_amount, 200.0);
        assert_eq!(booking.provider_amount, 1800.0);
        assert!(booking.is_pending());

        let provider = f.providers.find_by_id(&f.provider_id).await.unwrap().unwrap();
        assert_eq!(provider.total_bookings, 1);
    }

    #[tokio::test]
    async fn test_create_booking_uses_custom_rate() {
        let f = fixture().await;
        f.providers
            .add_provider_service(zaintza_core::ProviderService {
                provider_id: f.provider_id,
                service_id: f.service_id,
                custom_rate: Some(300.0),
                is_active: true,
            })
            .await;

        let booking = f.service.create_booking(input(&f)).await.unwrap();
        assert_eq!(booking.total_amount, 2400.0);
    }

    #[tokio::test]
    async fn test_create_booking_unknown_provider() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.provider_id = ProviderId::new();
        let result = f.service.create_booking(bad).await;
        assert!(matches!(result, Err(DomainError::InvalidProvider(_))));
    }

    #[tokio::test]
    async fn test_create_booking_inactive_provider() {
        let f = fixture().await;
        let mut provider = f.providers.find_by_id(&f.provider_id).await.unwrap().unwrap();
        provider.deactivate();
        f.providers.save(&provider).await.unwrap();

        let result = f.service.create_booking(input(&f)).await;
        assert!(matches!(result, Err(DomainError::InvalidProvider(_))));
    }

    #[tokio::test]
    async fn test_create_booking_unknown_service() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.service_id = ServiceId::new();
        let result = f.service.create_booking(bad).await;
        assert!(matches!(result, Err(DomainError::InvalidService(_))));
    }

    #[tokio::test]
    async fn test_create_booking_unknown_client() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.client_id = UserId::new();
        let result = f.service.create_booking(bad).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_booking_outside_availability() {
        let f = fixture().await;
        let scheduled = Utc::now() + Duration::days(2);
        let weekday = scheduled.weekday().num_days_from_monday() as u8;
        // Window on the right weekday that the 8h booking cannot fit
        f.providers
            .add_availability(zaintza_core::ProviderAvailability {
                provider_id: f.provider_id,
                weekday,
                start: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            })
            .await;

        let mut request = input(&f);
        request.scheduled_at = scheduled;
        let result = f.service.create_booking(request).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancel_booking_records_reason() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();

        let cancelled = f
            .service
            .cancel_booking(
                &booking.id,
                &f.client_id,
                Some("schedule conflict".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(cancelled.status.as_str(), "cancelled");
        assert_eq!(cancelled.cancelled_by, Some(CancelActor::Client));
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("schedule conflict")
        );
    }

    #[tokio::test]
    async fn test_cancel_booking_wrong_client_is_not_found() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();

        let result = f
            .service
            .cancel_booking(&booking.id, &UserId::new(), None)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_completed_booking_fails() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();
        f.service.confirm_booking(&booking.id).await.unwrap();
        f.service.start_booking(&booking.id).await.unwrap();
        f.service.complete_booking(&booking.id).await.unwrap();

        let result = f.service.cancel_booking(&booking.id, &f.client_id, None).await;
        assert!(matches!(result, Err(DomainError::CannotCancel(_))));

        // Booking unchanged
        let unchanged = f.service.get_booking(&booking.id).await.unwrap();
        assert_eq!(unchanged.status.as_str(), "completed");
    }

    #[tokio::test]
    async fn test_cancel_twice_reports_already_cancelled() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();
        f.service
            .cancel_booking(&booking.id, &f.client_id, None)
            .await
            .unwrap();

        let result = f.service.cancel_booking(&booking.id, &f.client_id, None).await;
        assert!(matches!(result, Err(DomainError::AlreadyCancelled(_))));
    }

    #[tokio::test]
    async fn test_reject_only_from_pending() {
        let f = fixture().await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();
        f.service.confirm_booking(&booking.id).await.unwrap();

        let result = f.service.reject_booking(&booking.id).await;
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    /// Booking repository that reports a number collision for the first
    /// N creates, then delegates to the in-memory store
    struct CollidingBookingRepository {
        inner: InMemoryBookingRepository,
        collisions_left: AtomicU32,
    }

    impl CollidingBookingRepository {
        fn new(collisions: u32) -> Self {
            Self {
                inner: InMemoryBookingRepository::new(),
                collisions_left: AtomicU32::new(collisions),
            }
        }
    }

    #[async_trait]
    impl BookingRepository for CollidingBookingRepository {
        async fn create(&self, booking: &Booking) -> DomainResult<()> {
            if self
                .collisions_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(DomainError::DuplicateBookingNumber(
                    booking.booking_number.to_string(),
                ));
            }
            self.inner.create(booking).await
        }

        async fn update(&self, booking: &Booking) -> DomainResult<()> {
            self.inner.update(booking).await
        }

        async fn find_by_id(&self, id: &BookingId) -> DomainResult<Option<Booking>> {
            self.inner.find_by_id(id).await
        }

        async fn find_for_review(
            &self,
            booking_id: &BookingId,
            client_id: &UserId,
            provider_id: &ProviderId,
        ) -> DomainResult<Option<Booking>> {
            self.inner
                .find_for_review(booking_id, client_id, provider_id)
                .await
        }

        async fn list_by_client(&self, client_id: &UserId) -> DomainResult<Vec<Booking>> {
            self.inner.list_by_client(client_id).await
        }

        async fn list_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Booking>> {
            self.inner.list_by_provider(provider_id).await
        }
    }

    #[tokio::test]
    async fn test_number_collision_is_retried() {
        let f = fixture_with_bookings(Arc::new(CollidingBookingRepository::new(2))).await;
        let booking = f.service.create_booking(input(&f)).await.unwrap();
        assert!(booking.is_pending());
    }

    #[tokio::test]
    async fn test_number_collision_retry_is_bounded() {
        let f = fixture_with_bookings(Arc::new(CollidingBookingRepository::new(u32::MAX))).await;
        let result = f.service.create_booking(input(&f)).await;
        assert!(matches!(
            result,
            Err(DomainError::DuplicateBookingNumber(_))
        ));
    }
}
