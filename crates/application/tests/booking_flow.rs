//! End-to-end booking flow over the in-memory adapters:
//! create, pay, confirm, start, complete, review.

use chrono::{Duration, Utc};
use std::sync::Arc;
use zaintza_adapters::{
    InMemoryBookingRepository, InMemoryPaymentRepository, InMemoryProviderRepository,
    InMemoryReviewRepository, InMemoryServiceRepository, InMemoryUserRepository,
};
use zaintza_application::{
    BookingService, CreateBookingInput, CreateReviewInput, PaymentService, ReviewService,
};
use zaintza_core::{Provider, Service, ServiceCategory, User, UserRole};
use zaintza_ports::{ProviderRepository, ServiceRepository, UserRepository};
use zaintza_shared_types::{
    CategoryId, CityId, PaymentMethod, PaymentStatus, ProviderId, ServiceId, UserId,
};

struct World {
    bookings: BookingService,
    reviews: ReviewService,
    payments: PaymentService,
    providers: Arc<InMemoryProviderRepository>,
    client_id: UserId,
    provider_id: ProviderId,
    service_id: ServiceId,
    city_id: CityId,
}

async fn world() -> World {
    let booking_repo = Arc::new(InMemoryBookingRepository::new());
    let provider_repo = Arc::new(InMemoryProviderRepository::new());
    let service_repo = Arc::new(InMemoryServiceRepository::new());
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let review_repo = Arc::new(InMemoryReviewRepository::new());
    let payment_repo = Arc::new(InMemoryPaymentRepository::new());

    let client = User::new(
        UserId::new(),
        "Jon Agirre".to_string(),
        "jon@example.com".to_string(),
        UserRole::Client,
    )
    .unwrap();
    user_repo.save(&client).await.unwrap();

    let city_id = CityId::new();
    let provider = Provider::new(
        ProviderId::new(),
        UserId::new(),
        "Miren Etxebarria".to_string(),
        city_id,
        250.0,
    )
    .unwrap();
    provider_repo.save(&provider).await.unwrap();

    let category = ServiceCategory::new(CategoryId::new(), "Home care".to_string()).unwrap();
    service_repo.save_category(&category).await.unwrap();
    let service = Service::new(
        ServiceId::new(),
        category.id,
        "Elderly companionship".to_string(),
        220.0,
    )
    .unwrap();
    service_repo.save(&service).await.unwrap();

    World {
        bookings: BookingService::new(
            booking_repo.clone(),
            provider_repo.clone(),
            service_repo.clone(),
            user_repo.clone(),
        ),
        reviews: ReviewService::new(review_repo, booking_repo.clone(), provider_repo.clone()),
        payments: PaymentService::new(payment_repo, booking_repo),
        providers: provider_repo,
        client_id: client.id,
        provider_id: provider.id,
        service_id: service.id,
        city_id,
    }
}

fn booking_input(w: &World) -> CreateBookingInput {
    CreateBookingInput {
        client_id: w.client_id,
        provider_id: w.provider_id,
        service_id: w.service_id,
        city_id: w.city_id,
        scheduled_at: Utc::now() + Duration::days(3),
        duration_hours: 8,
        address: "Calle Mayor 12, 3B, Bilbao".to_string(),
        notes: Some("second floor, no lift".to_string()),
    }
}

#[tokio::test]
async fn full_booking_lifecycle_with_review() {
    let w = world().await;

    // Create: 250/h x 8h, 10% platform commission
    let booking = w.bookings.create_booking(booking_input(&w)).await.unwrap();
    assert_eq!(booking.total_amount, 2000.0);
    assert_eq!(booking.commission_amount, 200.0);
    assert_eq!(booking.provider_amount, 1800.0);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);

    // Pay through the mock gateway
    let payment = w
        .payments
        .record_payment(&booking.id, PaymentMethod::Card)
        .await
        .unwrap();
    assert_eq!(payment.amount, 2000.0);

    // Drive the visit to completion
    w.bookings.confirm_booking(&booking.id).await.unwrap();
    w.bookings.start_booking(&booking.id).await.unwrap();
    let done = w.bookings.complete_booking(&booking.id).await.unwrap();
    assert_eq!(done.status.as_str(), "completed");
    assert_eq!(done.payment_status, PaymentStatus::Paid);

    // Review it
    w.reviews
        .create_review(CreateReviewInput {
            client_id: w.client_id,
            provider_id: w.provider_id,
            booking_id: booking.id,
            rating: 5,
            title: Some("Wonderful care".to_string()),
            comment: None,
        })
        .await
        .unwrap();

    let provider = w.providers.find_by_id(&w.provider_id).await.unwrap().unwrap();
    assert_eq!(provider.total_bookings, 1);
    assert_eq!(provider.total_reviews, 1);
    assert_eq!(provider.rating, 5.0);
}

#[tokio::test]
async fn listing_follows_ownership() {
    let w = world().await;
    let first = w.bookings.create_booking(booking_input(&w)).await.unwrap();
    let second = w.bookings.create_booking(booking_input(&w)).await.unwrap();

    let mine = w.bookings.list_for_client(&w.client_id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_ne!(first.booking_number, second.booking_number);

    let theirs = w.bookings.list_for_provider(&w.provider_id).await.unwrap();
    assert_eq!(theirs.len(), 2);

    let nobody = w.bookings.list_for_client(&UserId::new()).await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn booking_numbers_stay_unique_across_a_burst() {
    let w = world().await;
    let mut numbers = std::collections::HashSet::new();
    for _ in 0..20 {
        let booking = w.bookings.create_booking(booking_input(&w)).await.unwrap();
        assert!(
            numbers.insert(booking.booking_number.as_str().to_string()),
            "duplicate booking number survived creation"
        );
    }
}
