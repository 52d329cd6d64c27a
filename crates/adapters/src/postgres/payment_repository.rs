//! PostgreSQL Payment Repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use zaintza_core::Payment;
use zaintza_ports::PaymentRepository;
use zaintza_shared_types::{
    BookingId, DomainError, DomainResult, PaymentId, PaymentMethod, PaymentStatus,
};

#[derive(Debug)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for payments
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id UUID PRIMARY KEY,
                booking_id UUID NOT NULL UNIQUE,
                amount DOUBLE PRECISION NOT NULL,
                method TEXT NOT NULL,
                transaction_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create payments table: {}", e))
        })?;

        Ok(())
    }

    fn map_row(row: &PgRow) -> DomainResult<Payment> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.get("id")),
            booking_id: BookingId::from_uuid(row.get("booking_id")),
            amount: row.get("amount"),
            method: PaymentMethod::parse(&row.get::<String, _>("method"))?,
            transaction_id: row.get("transaction_id"),
            status: PaymentStatus::parse(&row.get::<String, _>("status"))?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, payment: &Payment) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, booking_id, amount, method, transaction_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.booking_id.as_uuid())
        .bind(payment.amount)
        .bind(payment.method.as_str())
        .bind(&payment.transaction_id)
        .bind(payment.status.as_str())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                DomainError::Validation(format!(
                    "booking {} already has a payment",
                    payment.booking_id
                ))
            } else {
                DomainError::Infrastructure(format!("failed to create payment: {}", e))
            }
        })?;

        Ok(())
    }

    async fn find_by_booking(&self, booking_id: &BookingId) -> DomainResult<Option<Payment>> {
        let row = sqlx::query("SELECT * FROM payments WHERE booking_id = $1")
            .bind(booking_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get payment: {}", e)))?;

        row.as_ref().map(Self::map_row).transpose()
    }
}
