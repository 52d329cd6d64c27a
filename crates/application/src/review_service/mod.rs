//! Application Service for the Review Aggregator
//!
//! A review may only be written once, by the booking's client, after the
//! booking completed. The provider's rating is a running accumulator:
//! applying or retracting a rating is one atomic repository operation,
//! never a rescan of the review set.

use std::sync::Arc;
use tracing::info;
use zaintza_core::Review;
use zaintza_ports::{BookingRepository, ProviderRepository, ReviewRepository};
use zaintza_shared_types::{
    BookingId, BookingState, DomainError, DomainResult, ProviderId, ReviewId, UserId,
};

#[derive(Debug, Clone)]
pub struct CreateReviewInput {
    pub client_id: UserId,
    pub provider_id: ProviderId,
    pub booking_id: BookingId,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
    providers: Arc<dyn ProviderRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        bookings: Arc<dyn BookingRepository>,
        providers: Arc<dyn ProviderRepository>,
    ) -> Self {
        Self {
            reviews,
            bookings,
            providers,
        }
    }

    /// Create a review for a completed booking and fold its rating into
    /// the provider aggregate
    ///
    /// # Errors
    /// - `DomainError::InvalidBooking` when no booking matches
    ///   (booking, client, provider) or it is not completed
    /// - `DomainError::DuplicateReview` when the booking already has one
    /// - `DomainError::Validation` for a rating outside 1..=5
    pub async fn create_review(&self, input: CreateReviewInput) -> DomainResult<Review> {
        let booking = self
            .bookings
            .find_for_review(&input.booking_id, &input.client_id, &input.provider_id)
            .await?
            .ok_or_else(|| DomainError::InvalidBooking("no matching booking".to_string()))?;

        if booking.status.as_str() != BookingState::COMPLETED {
            return Err(DomainError::InvalidBooking(
                "booking is not completed".to_string(),
            ));
        }

        if self.reviews.exists_for_booking(&input.booking_id).await? {
            return Err(DomainError::DuplicateReview(input.booking_id.to_string()));
        }

        let review = Review::new(
            ReviewId::new(),
            input.booking_id,
            input.client_id,
            input.provider_id,
            input.rating,
            input.title,
            input.comment,
        )?;

        // The unique constraint on the booking reference backstops the
        // exists check under concurrent creation.
        self.reviews.create(&review).await?;
        self.providers
            .apply_review_rating(&input.provider_id, review.rating)
            .await?;

        info!(
            provider = %input.provider_id,
            rating = review.rating,
            "review created"
        );
        Ok(review)
    }

    /// Take a review out of the aggregate (moderation)
    ///
    /// # Errors
    /// - `DomainError::NotFound` for an unknown review
    /// - `DomainError::Validation` when it is already inactive
    pub async fn deactivate_review(&self, review_id: &ReviewId) -> DomainResult<Review> {
        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("review {}", review_id)))?;

        if !review.is_active {
            return Err(DomainError::Validation(
                "review is already inactive".to_string(),
            ));
        }

        review.deactivate();
        self.reviews.update(&review).await?;
        self.providers
            .retract_review_rating(&review.provider_id, review.rating)
            .await?;

        info!(review = %review.id, provider = %review.provider_id, "review deactivated");
        Ok(review)
    }

    /// Active reviews for a provider, newest first
    pub async fn provider_reviews(&self, provider_id: &ProviderId) -> DomainResult<Vec<Review>> {
        self.reviews.list_active_by_provider(provider_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use zaintza_adapters::{
        InMemoryBookingRepository, InMemoryProviderRepository, InMemoryReviewRepository,
    };
    use zaintza_core::{Booking, BookingDetails, Provider, Quote};
    use zaintza_shared_types::{BookingNumber, CityId, ServiceId};

    struct Fixture {
        service: ReviewService,
        bookings: Arc<InMemoryBookingRepository>,
        providers: Arc<InMemoryProviderRepository>,
        client_id: UserId,
        provider_id: ProviderId,
    }

    async fn fixture() -> Fixture {
        let reviews = Arc::new(InMemoryReviewRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let providers = Arc::new(InMemoryProviderRepository::new());

        let provider = Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Miren Etxebarria".to_string(),
            CityId::new(),
            250.0,
        )
        .unwrap();
        providers.save(&provider).await.unwrap();

        Fixture {
            service: ReviewService::new(reviews, bookings.clone(), providers.clone()),
            bookings,
            providers,
            client_id: UserId::new(),
            provider_id: provider.id,
        }
    }

    async fn completed_booking(f: &Fixture) -> Booking {
        let mut booking = Booking::new(
            BookingId::new(),
            BookingNumber::generate(Utc::now()),
            BookingDetails {
                client_id: f.client_id,
                provider_id: f.provider_id,
                service_id: ServiceId::new(),
                city_id: CityId::new(),
                scheduled_at: Utc::now() + Duration::days(1),
                duration_hours: 2,
                address: "Gran Via 45, 2A, Bilbao".to_string(),
                notes: None,
            },
            Quote::new(500.0, 10.0).unwrap(),
        )
        .unwrap();
        booking.confirm().unwrap();
        booking.start().unwrap();
        booking.complete().unwrap();
        f.bookings.create(&booking).await.unwrap();
        booking
    }

    fn review_input(f: &Fixture, booking: &Booking, rating: u8) -> CreateReviewInput {
        CreateReviewInput {
            client_id: f.client_id,
            provider_id: f.provider_id,
            booking_id: booking.id,
            rating,
            title: None,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_review_updates_provider_aggregate() {
        let f = fixture().await;

        for rating in [5, 5] {
            let booking = completed_booking(&f).await;
            f.service
                .create_review(review_input(&f, &booking, rating))
                .await
                .unwrap();
        }
        let booking = completed_booking(&f).await;
        f.service
            .create_review(review_input(&f, &booking, 4))
            .await
            .unwrap();

        let provider = f.providers.find_by_id(&f.provider_id).await.unwrap().unwrap();
        assert_eq!(provider.total_reviews, 3);
        assert_eq!(provider.rating, 4.67);
    }

    #[tokio::test]
    async fn test_review_requires_completed_booking() {
        let f = fixture().await;
        let booking = Booking::new(
            BookingId::new(),
            BookingNumber::generate(Utc::now()),
            BookingDetails {
                client_id: f.client_id,
                provider_id: f.provider_id,
                service_id: ServiceId::new(),
                city_id: CityId::new(),
                scheduled_at: Utc::now() + Duration::days(1),
                duration_hours: 2,
                address: "Gran Via 45, 2A, Bilbao".to_string(),
                notes: None,
            },
            Quote::new(500.0, 10.0).unwrap(),
        )
        .unwrap();
        f.bookings.create(&booking).await.unwrap();

        let result = f
            .service
            .create_review(review_input(&f, &booking, 5))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidBooking(_))));
    }

    #[tokio::test]
    async fn test_review_requires_matching_parties() {
        let f = fixture().await;
        let booking = completed_booking(&f).await;

        let mut input = review_input(&f, &booking, 5);
        input.client_id = UserId::new();
        let result = f.service.create_review(input).await;
        assert!(matches!(result, Err(DomainError::InvalidBooking(_))));
    }

    #[tokio::test]
    async fn test_second_review_is_duplicate() {
        let f = fixture().await;
        let booking = completed_booking(&f).await;

        f.service
            .create_review(review_input(&f, &booking, 4))
            .await
            .unwrap();
        let result = f
            .service
            .create_review(review_input(&f, &booking, 2))
            .await;
        assert!(matches!(result, Err(DomainError::DuplicateReview(_))));

        let provider = f.providers.find_by_id(&f.provider_id).await.unwrap().unwrap();
        assert_eq!(provider.total_reviews, 1);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_rejected() {
        let f = fixture().await;
        let booking = completed_booking(&f).await;

        let result = f.service.create_review(review_input(&f, &booking, 6)).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_deactivate_review_retracts_rating() {
        let f = fixture().await;
        let booking = completed_booking(&f).await;
        let review = f
            .service
            .create_review(review_input(&f, &booking, 2))
            .await
            .unwrap();

        let booking2 = completed_booking(&f).await;
        f.service
            .create_review(review_input(&f, &booking2, 5))
            .await
            .unwrap();

        f.service.deactivate_review(&review.id).await.unwrap();

        let provider = f.providers.find_by_id(&f.provider_id).await.unwrap().unwrap();
        assert_eq!(provider.total_reviews, 1);
        assert_eq!(provider.rating, 5.0);
        assert!(f
            .service
            .provider_reviews(&f.provider_id)
            .await
            .unwrap()
            .iter()
            .all(|r| r.id != review.id));

        // Deactivating twice is rejected
        let result = f.service.deactivate_review(&review.id).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
