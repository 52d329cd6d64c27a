//! HTTP Handlers
//!
//! Request handlers for the API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use zaintza_application::{
    BookingService, CreateBookingInput, CreateReviewInput, PaymentService, ReviewService,
};
use zaintza_core::{nearest_city, Booking, City, Payment, Provider, Review};
use zaintza_ports::{CityRepository, ProviderFilter, ProviderRepository, ServiceRepository};
use zaintza_shared_types::{
    BookingId, CategoryId, CityId, DomainError, PaymentMethod, ProviderId, ReviewId, ServiceId,
    UserId,
};

// ==================== APPLICATION STATE ====================

#[derive(Clone)]
pub struct AppState {
    pub booking_service: Arc<BookingService>,
    pub review_service: Arc<ReviewService>,
    pub payment_service: Arc<PaymentService>,
    pub providers: Arc<dyn ProviderRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub cities: Arc<dyn CityRepository>,
}

// ==================== RESPONSE ENVELOPE & ERRORS ====================

#[derive(Serialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Domain error carried out of a handler
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            DomainError::Validation(_)
            | DomainError::InvalidProvider(_)
            | DomainError::InvalidService(_)
            | DomainError::InvalidBooking(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::AlreadyCancelled(_)
            | DomainError::CannotCancel(_)
            | DomainError::DuplicateReview(_)
            | DomainError::DuplicateBookingNumber(_)
            | DomainError::InvalidStateTransition { .. }
            | DomainError::Concurrency(_) => StatusCode::CONFLICT,
            DomainError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ==================== REQUEST/RESPONSE DTOs ====================

#[derive(Deserialize, Debug)]
pub struct CreateBookingRequest {
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub city_id: Uuid,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub duration_hours: u32,
    pub address: String,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CancelBookingRequest {
    pub client_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ListBookingsQuery {
    pub client_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
pub struct PaymentRequest {
    pub method: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateReviewRequest {
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub booking_id: Uuid,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ProviderSearchQuery {
    pub city_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    #[serde(default)]
    pub verified_only: bool,
}

#[derive(Deserialize, Debug)]
pub struct ListServicesQuery {
    pub category_id: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
pub struct NearestCityQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub booking_number: String,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub city_id: Uuid,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub duration_hours: u32,
    pub address: String,
    pub notes: Option<String>,
    pub status: String,
    pub total_amount: f64,
    pub commission_amount: f64,
    pub provider_amount: f64,
    pub payment_status: String,
    pub cancelled_by: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_start: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_end: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_duration_hours: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.as_uuid(),
            booking_number: booking.booking_number.to_string(),
            client_id: booking.details.client_id.as_uuid(),
            provider_id: booking.details.provider_id.as_uuid(),
            service_id: booking.details.service_id.as_uuid(),
            city_id: booking.details.city_id.as_uuid(),
            scheduled_at: booking.details.scheduled_at,
            duration_hours: booking.details.duration_hours,
            address: booking.details.address.clone(),
            notes: booking.details.notes.clone(),
            status: booking.status.as_str().to_string(),
            total_amount: booking.total_amount,
            commission_amount: booking.commission_amount,
            provider_amount: booking.provider_amount,
            payment_status: booking.payment_status.as_str().to_string(),
            cancelled_by: booking.cancelled_by.map(|a| a.as_str().to_string()),
            cancellation_reason: booking.cancellation_reason.clone(),
            cancelled_at: booking.cancelled_at,
            actual_start: booking.actual_start,
            actual_end: booking.actual_end,
            actual_duration_hours: booking.actual_duration_hours,
            created_at: booking.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
    pub total: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub booking_id: Uuid,
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub status: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id.as_uuid(),
            booking_id: payment.booking_id.as_uuid(),
            amount: payment.amount,
            method: payment.method.as_str().to_string(),
            transaction_id: payment.transaction_id.clone(),
            status: payment.status.as_str().to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ReviewResponse {
    pub review_id: Uuid,
    pub booking_id: Uuid,
    pub provider_id: Uuid,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            review_id: review.id.as_uuid(),
            booking_id: review.booking_id.as_uuid(),
            provider_id: review.provider_id.as_uuid(),
            rating: review.rating,
            title: review.title.clone(),
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ProviderResponse {
    pub provider_id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub city_id: Uuid,
    pub hourly_rate: f64,
    pub is_verified: bool,
    pub rating: f64,
    pub total_reviews: u32,
    pub total_bookings: u64,
}

impl From<&Provider> for ProviderResponse {
    fn from(provider: &Provider) -> Self {
        Self {
            provider_id: provider.id.as_uuid(),
            display_name: provider.display_name.clone(),
            bio: provider.bio.clone(),
            city_id: provider.city_id.as_uuid(),
            hourly_rate: provider.hourly_rate,
            is_verified: provider.is_verified,
            rating: provider.rating,
            total_reviews: provider.total_reviews,
            total_bookings: provider.total_bookings,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CityResponse {
    pub city_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&City> for CityResponse {
    fn from(city: &City) -> Self {
        Self {
            city_id: city.id.as_uuid(),
            name: city.name.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

// ==================== HEALTH ====================

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "zaintza-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ==================== BOOKING HANDLERS ====================

pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .create_booking(CreateBookingInput {
            client_id: UserId::from_uuid(request.client_id),
            provider_id: ProviderId::from_uuid(request.provider_id),
            service_id: ServiceId::from_uuid(request.service_id),
            city_id: CityId::from_uuid(request.city_id),
            scheduled_at: request.scheduled_at,
            duration_hours: request.duration_hours,
            address: request.address,
            notes: request.notes,
        })
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .get_booking(&BookingId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> ApiResult<BookingListResponse> {
    let bookings = match (query.client_id, query.provider_id) {
        (Some(client), None) => {
            state
                .booking_service
                .list_for_client(&UserId::from_uuid(client))
                .await?
        }
        (None, Some(provider)) => {
            state
                .booking_service
                .list_for_provider(&ProviderId::from_uuid(provider))
                .await?
        }
        _ => {
            return Err(DomainError::Validation(
                "exactly one of client_id or provider_id is required".to_string(),
            )
            .into())
        }
    };
    let total = bookings.len();
    Ok(ApiResponse::ok(BookingListResponse {
        bookings: bookings.iter().map(Into::into).collect(),
        total,
    }))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelBookingRequest>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .cancel_booking(
            &BookingId::from_uuid(id),
            &UserId::from_uuid(request.client_id),
            request.reason,
        )
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .confirm_booking(&BookingId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn reject_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .reject_booking(&BookingId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn start_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .start_booking(&BookingId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BookingResponse> {
    let booking = state
        .booking_service
        .complete_booking(&BookingId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&booking).into()))
}

pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<PaymentResponse> {
    let method = PaymentMethod::parse(&request.method)?;
    let payment = state
        .payment_service
        .record_payment(&BookingId::from_uuid(id), method)
        .await?;
    Ok(ApiResponse::ok((&payment).into()))
}

// ==================== REVIEW HANDLERS ====================

pub async fn create_review(
    State(state): State<AppState>,
    Json(request): Json<CreateReviewRequest>,
) -> ApiResult<ReviewResponse> {
    let review = state
        .review_service
        .create_review(CreateReviewInput {
            client_id: UserId::from_uuid(request.client_id),
            provider_id: ProviderId::from_uuid(request.provider_id),
            booking_id: BookingId::from_uuid(request.booking_id),
            rating: request.rating,
            title: request.title,
            comment: request.comment,
        })
        .await?;
    Ok(ApiResponse::ok((&review).into()))
}

pub async fn deactivate_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ReviewResponse> {
    let review = state
        .review_service
        .deactivate_review(&ReviewId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok((&review).into()))
}

pub async fn provider_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ReviewResponse>> {
    let reviews = state
        .review_service
        .provider_reviews(&ProviderId::from_uuid(id))
        .await?;
    Ok(ApiResponse::ok(reviews.iter().map(Into::into).collect()))
}

// ==================== BROWSING HANDLERS ====================

pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProviderResponse> {
    let provider = state
        .providers
        .find_by_id(&ProviderId::from_uuid(id))
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("provider {}", id)))?;
    Ok(ApiResponse::ok((&provider).into()))
}

pub async fn search_providers(
    State(state): State<AppState>,
    Query(query): Query<ProviderSearchQuery>,
) -> ApiResult<Vec<ProviderResponse>> {
    let filter = ProviderFilter {
        city_id: query.city_id.map(CityId::from_uuid),
        service_id: query.service_id.map(ServiceId::from_uuid),
        verified_only: query.verified_only,
    };
    let providers = state.providers.search(&filter).await?;
    Ok(ApiResponse::ok(providers.iter().map(Into::into).collect()))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<zaintza_core::ServiceCategory>> {
    Ok(ApiResponse::ok(state.services.list_categories().await?))
}

pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ListServicesQuery>,
) -> ApiResult<Vec<zaintza_core::Service>> {
    let category = query.category_id.map(CategoryId::from_uuid);
    Ok(ApiResponse::ok(
        state.services.list(category.as_ref()).await?,
    ))
}

pub async fn list_cities(State(state): State<AppState>) -> ApiResult<Vec<CityResponse>> {
    let cities = state.cities.list_active().await?;
    Ok(ApiResponse::ok(cities.iter().map(Into::into).collect()))
}

pub async fn nearest_city_handler(
    State(state): State<AppState>,
    Query(query): Query<NearestCityQuery>,
) -> ApiResult<CityResponse> {
    let cities = state.cities.list_active().await?;
    let nearest = nearest_city(&cities, query.lat, query.lng)
        .ok_or_else(|| DomainError::NotFound("no active cities".to_string()))?;
    Ok(ApiResponse::ok(nearest.into()))
}
