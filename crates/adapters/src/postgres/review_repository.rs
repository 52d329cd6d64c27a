//! PostgreSQL Review Repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use zaintza_core::Review;
use zaintza_ports::ReviewRepository;
use zaintza_shared_types::{
    BookingId, DomainError, DomainResult, ProviderId, ReviewId, UserId,
};

#[derive(Debug)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for reviews
    ///
    /// The unique constraint on `booking_id` is the backstop for the
    /// one-review-per-booking rule.
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id UUID PRIMARY KEY,
                booking_id UUID NOT NULL UNIQUE,
                client_id UUID NOT NULL,
                provider_id UUID NOT NULL,
                rating SMALLINT NOT NULL,
                title TEXT NULL,
                comment TEXT NULL,
                is_active BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create reviews table: {}", e))
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reviews_provider ON reviews(provider_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to create index: {}", e)))?;

        Ok(())
    }

    fn map_row(row: &PgRow) -> Review {
        Review {
            id: ReviewId::from_uuid(row.get("id")),
            booking_id: BookingId::from_uuid(row.get("booking_id")),
            client_id: UserId::from_uuid(row.get("client_id")),
            provider_id: ProviderId::from_uuid(row.get("provider_id")),
            rating: row.get::<i16, _>("rating") as u8,
            title: row.get("title"),
            comment: row.get("comment"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (
                id, booking_id, client_id, provider_id, rating, title, comment,
                is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.booking_id.as_uuid())
        .bind(review.client_id.as_uuid())
        .bind(review.provider_id.as_uuid())
        .bind(review.rating as i16)
        .bind(&review.title)
        .bind(&review.comment)
        .bind(review.is_active)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                DomainError::DuplicateReview(review.booking_id.to_string())
            } else {
                DomainError::Infrastructure(format!("failed to create review: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update(&self, review: &Review) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = $2, title = $3, comment = $4, is_active = $5 WHERE id = $1",
        )
        .bind(review.id.as_uuid())
        .bind(review.rating as i16)
        .bind(&review.title)
        .bind(&review.comment)
        .bind(review.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to update review: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("review {}", review.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> DomainResult<Option<Review>> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get review: {}", e)))?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn exists_for_booking(&self, booking_id: &BookingId) -> DomainResult<bool> {
        let row = sqlx::query("SELECT 1 AS one FROM reviews WHERE booking_id = $1")
            .bind(booking_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to check review: {}", e)))?;

        Ok(row.is_some())
    }

    async fn list_active_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Review>> {
        let rows = sqlx::query(
            "SELECT * FROM reviews WHERE provider_id = $1 AND is_active ORDER BY created_at DESC",
        )
        .bind(provider_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to list reviews: {}", e)))?;

        Ok(rows.iter().map(Self::map_row).collect())
    }
}
