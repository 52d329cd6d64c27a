//! PostgreSQL Booking Repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;
use zaintza_core::{Booking, BookingDetails};
use zaintza_ports::BookingRepository;
use zaintza_shared_types::{
    BookingId, BookingNumber, BookingState, CancelActor, CityId, DomainError, DomainResult,
    PaymentStatus, ProviderId, ServiceId, UserId,
};

#[derive(Debug)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for bookings
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id UUID PRIMARY KEY,
                booking_number TEXT NOT NULL UNIQUE,
                client_id UUID NOT NULL,
                provider_id UUID NOT NULL,
                service_id UUID NOT NULL,
                city_id UUID NOT NULL,
                scheduled_at TIMESTAMPTZ NOT NULL,
                duration_hours INT NOT NULL,
                address TEXT NOT NULL,
                notes TEXT NULL,
                status TEXT NOT NULL,
                total_amount DOUBLE PRECISION NOT NULL,
                commission_amount DOUBLE PRECISION NOT NULL,
                provider_amount DOUBLE PRECISION NOT NULL,
                payment_status TEXT NOT NULL,
                cancelled_by TEXT NULL,
                cancellation_reason TEXT NULL,
                cancelled_at TIMESTAMPTZ NULL,
                actual_start TIMESTAMPTZ NULL,
                actual_end TIMESTAMPTZ NULL,
                actual_duration_hours DOUBLE PRECISION NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create bookings table: {}", e))
        })?;

        for ddl in [
            "CREATE INDEX IF NOT EXISTS idx_bookings_client ON bookings(client_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_provider ON bookings(provider_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)",
        ] {
            sqlx::query(ddl).execute(&self.pool).await.map_err(|e| {
                DomainError::Infrastructure(format!("failed to create index: {}", e))
            })?;
        }

        info!("booking schema initialized");
        Ok(())
    }

    fn map_row(row: &PgRow) -> DomainResult<Booking> {
        let cancelled_by: Option<String> = row.get("cancelled_by");
        Ok(Booking {
            id: BookingId::from_uuid(row.get("id")),
            booking_number: BookingNumber::new(row.get("booking_number"))?,
            details: BookingDetails {
                client_id: UserId::from_uuid(row.get("client_id")),
                provider_id: ProviderId::from_uuid(row.get("provider_id")),
                service_id: ServiceId::from_uuid(row.get("service_id")),
                city_id: CityId::from_uuid(row.get("city_id")),
                scheduled_at: row.get("scheduled_at"),
                duration_hours: row.get::<i32, _>("duration_hours") as u32,
                address: row.get("address"),
                notes: row.get("notes"),
            },
            status: BookingState::new(row.get("status"))?,
            total_amount: row.get("total_amount"),
            commission_amount: row.get("commission_amount"),
            provider_amount: row.get("provider_amount"),
            payment_status: PaymentStatus::parse(&row.get::<String, _>("payment_status"))?,
            cancelled_by: cancelled_by
                .as_deref()
                .map(CancelActor::parse)
                .transpose()?,
            cancellation_reason: row.get("cancellation_reason"),
            cancelled_at: row.get("cancelled_at"),
            actual_start: row.get("actual_start"),
            actual_end: row.get("actual_end"),
            actual_duration_hours: row.get("actual_duration_hours"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create(&self, booking: &Booking) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, booking_number, client_id, provider_id, service_id, city_id,
                scheduled_at, duration_hours, address, notes, status,
                total_amount, commission_amount, provider_amount, payment_status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.booking_number.as_str())
        .bind(booking.details.client_id.as_uuid())
        .bind(booking.details.provider_id.as_uuid())
        .bind(booking.details.service_id.as_uuid())
        .bind(booking.details.city_id.as_uuid())
        .bind(booking.details.scheduled_at)
        .bind(booking.details.duration_hours as i32)
        .bind(&booking.details.address)
        .bind(&booking.details.notes)
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(booking.commission_amount)
        .bind(booking.provider_amount)
        .bind(booking.payment_status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                DomainError::DuplicateBookingNumber(booking.booking_number.to_string())
            } else {
                DomainError::Infrastructure(format!("failed to create booking: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> DomainResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2,
                total_amount = $3,
                commission_amount = $4,
                provider_amount = $5,
                payment_status = $6,
                cancelled_by = $7,
                cancellation_reason = $8,
                cancelled_at = $9,
                actual_start = $10,
                actual_end = $11,
                actual_duration_hours = $12,
                updated_at = $13
            WHERE id = $1
        "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(booking.commission_amount)
        .bind(booking.provider_amount)
        .bind(booking.payment_status.as_str())
        .bind(booking.cancelled_by.map(|a| a.as_str()))
        .bind(&booking.cancellation_reason)
        .bind(booking.cancelled_at)
        .bind(booking.actual_start)
        .bind(booking.actual_end)
        .bind(booking.actual_duration_hours)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to update booking: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("booking {}", booking.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> DomainResult<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get booking: {}", e)))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_for_review(
        &self,
        booking_id: &BookingId,
        client_id: &UserId,
        provider_id: &ProviderId,
    ) -> DomainResult<Option<Booking>> {
        let row = sqlx::query(
            "SELECT * FROM bookings WHERE id = $1 AND client_id = $2 AND provider_id = $3",
        )
        .bind(booking_id.as_uuid())
        .bind(client_id.as_uuid())
        .bind(provider_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to get booking: {}", e)))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_by_client(&self, client_id: &UserId) -> DomainResult<Vec<Booking>> {
        self.list_by_column("client_id", client_id.as_uuid()).await
    }

    async fn list_by_provider(&self, provider_id: &ProviderId) -> DomainResult<Vec<Booking>> {
        self.list_by_column("provider_id", provider_id.as_uuid())
            .await
    }
}

impl PostgresBookingRepository {
    async fn list_by_column(&self, column: &str, value: Uuid) -> DomainResult<Vec<Booking>> {
        // `column` is one of two fixed names, never user input
        let sql = format!(
            "SELECT * FROM bookings WHERE {} = $1 ORDER BY created_at DESC",
            column
        );
        let rows = sqlx::query(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to list bookings: {}", e)))?;

        rows.iter().map(Self::map_row).collect()
    }
}
