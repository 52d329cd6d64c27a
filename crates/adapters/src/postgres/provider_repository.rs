//! PostgreSQL Provider Repository
//!
//! Counter and aggregate updates are single UPDATE statements so they
//! stay atomic under concurrent writers.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use zaintza_core::{Provider, ProviderAvailability};
use zaintza_ports::{ProviderFilter, ProviderRepository};
use zaintza_shared_types::{CityId, DomainError, DomainResult, ProviderId, ServiceId, UserId};

#[derive(Debug)]
pub struct PostgresProviderRepository {
    pool: PgPool,
}

impl PostgresProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for providers, their availability
    /// windows, and per-service rate overrides
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS providers (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                display_name TEXT NOT NULL,
                bio TEXT NULL,
                city_id UUID NOT NULL,
                hourly_rate DOUBLE PRECISION NOT NULL,
                commission_rate DOUBLE PRECISION NOT NULL,
                is_active BOOLEAN NOT NULL,
                is_verified BOOLEAN NOT NULL,
                rating DOUBLE PRECISION NOT NULL,
                rating_sum BIGINT NOT NULL,
                total_reviews INT NOT NULL,
                total_bookings BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create providers table: {}", e))
        })?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS provider_availability (
                provider_id UUID NOT NULL,
                weekday SMALLINT NOT NULL,
                start_time TIME NOT NULL,
                end_time TIME NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create availability table: {}", e))
        })?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS provider_services (
                provider_id UUID NOT NULL,
                service_id UUID NOT NULL,
                custom_rate DOUBLE PRECISION NULL,
                is_active BOOLEAN NOT NULL,
                PRIMARY KEY (provider_id, service_id)
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create provider_services table: {}", e))
        })?;

        info!("provider schema initialized");
        Ok(())
    }

    fn map_row(row: &PgRow) -> Provider {
        Provider {
            id: ProviderId::from_uuid(row.get("id")),
            user_id: UserId::from_uuid(row.get("user_id")),
            display_name: row.get("display_name"),
            bio: row.get("bio"),
            city_id: CityId::from_uuid(row.get("city_id")),
            hourly_rate: row.get("hourly_rate"),
            commission_rate: row.get("commission_rate"),
            is_active: row.get("is_active"),
            is_verified: row.get("is_verified"),
            rating: row.get("rating"),
            rating_sum: row.get::<i64, _>("rating_sum") as u32,
            total_reviews: row.get::<i32, _>("total_reviews") as u32,
            total_bookings: row.get::<i64, _>("total_bookings") as u64,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl ProviderRepository for PostgresProviderRepository {
    async fn save(&self, provider: &Provider) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO providers (
                id, user_id, display_name, bio, city_id, hourly_rate,
                commission_rate, is_active, is_verified, rating, rating_sum,
                total_reviews, total_bookings, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                bio = EXCLUDED.bio,
                city_id = EXCLUDED.city_id,
                hourly_rate = EXCLUDED.hourly_rate,
                commission_rate = EXCLUDED.commission_rate,
                is_active = EXCLUDED.is_active,
                is_verified = EXCLUDED.is_verified,
                updated_at = EXCLUDED.updated_at
        "#,
        )
        .bind(provider.id.as_uuid())
        .bind(provider.user_id.as_uuid())
        .bind(&provider.display_name)
        .bind(&provider.bio)
        .bind(provider.city_id.as_uuid())
        .bind(provider.hourly_rate)
        .bind(provider.commission_rate)
        .bind(provider.is_active)
        .bind(provider.is_verified)
        .bind(provider.rating)
        .bind(provider.rating_sum as i64)
        .bind(provider.total_reviews as i32)
        .bind(provider.total_bookings as i64)
        .bind(provider.created_at)
        .bind(provider.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to save provider: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ProviderId) -> DomainResult<Option<Provider>> {
        let row = sqlx::query("SELECT * FROM providers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get provider: {}", e)))?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn search(&self, filter: &ProviderFilter) -> DomainResult<Vec<Provider>> {
        let rows = sqlx::query(
            r#"
            SELECT p.* FROM providers p
            WHERE p.is_active
              AND ($1::uuid IS NULL OR p.city_id = $1)
              AND (NOT $2 OR p.is_verified)
              AND ($3::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM provider_services ps
                    WHERE ps.provider_id = p.id
                      AND ps.service_id = $3
                      AND ps.is_active))
            ORDER BY p.rating DESC, p.total_reviews DESC
        "#,
        )
        .bind(filter.city_id.map(|c| c.as_uuid()))
        .bind(filter.verified_only)
        .bind(filter.service_id.map(|s| s.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to search providers: {}", e)))?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn increment_total_bookings(&self, id: &ProviderId) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE providers SET total_bookings = total_bookings + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to count booking: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("provider {}", id)));
        }
        Ok(())
    }

    async fn apply_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE providers
            SET rating_sum = rating_sum + $2,
                total_reviews = total_reviews + 1,
                rating = ROUND((rating_sum + $2)::numeric / (total_reviews + 1), 2)::double precision,
                updated_at = NOW()
            WHERE id = $1
        "#,
        )
        .bind(id.as_uuid())
        .bind(rating as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to apply review: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("provider {}", id)));
        }
        Ok(())
    }

    async fn retract_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE providers
            SET rating_sum = rating_sum - $2,
                total_reviews = total_reviews - 1,
                rating = CASE
                    WHEN total_reviews - 1 <= 0 THEN 0
                    ELSE ROUND((rating_sum - $2)::numeric / (total_reviews - 1), 2)::double precision
                END,
                updated_at = NOW()
            WHERE id = $1 AND total_reviews > 0 AND rating_sum >= $2
        "#,
        )
        .bind(id.as_uuid())
        .bind(rating as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to retract review: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Concurrency(
                "review aggregate out of step with review set".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_availability(&self, id: &ProviderId) -> DomainResult<Vec<ProviderAvailability>> {
        let rows = sqlx::query(
            "SELECT provider_id, weekday, start_time, end_time
             FROM provider_availability WHERE provider_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to list availability: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| ProviderAvailability {
                provider_id: ProviderId::from_uuid(row.get("provider_id")),
                weekday: row.get::<i16, _>("weekday") as u8,
                start: row.get("start_time"),
                end: row.get("end_time"),
            })
            .collect())
    }

    async fn custom_rate_for(
        &self,
        id: &ProviderId,
        service_id: &ServiceId,
    ) -> DomainResult<Option<f64>> {
        let row = sqlx::query(
            "SELECT custom_rate FROM provider_services
             WHERE provider_id = $1 AND service_id = $2 AND is_active",
        )
        .bind(id.as_uuid())
        .bind(service_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to get custom rate: {}", e)))?;

        Ok(row.and_then(|r| r.get("custom_rate")))
    }
}
