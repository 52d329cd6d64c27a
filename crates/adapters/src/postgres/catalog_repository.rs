//! PostgreSQL Service Catalogue Repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use zaintza_core::{Service, ServiceCategory};
use zaintza_ports::ServiceRepository;
use zaintza_shared_types::{CategoryId, DomainError, DomainResult, ServiceId};

#[derive(Debug)]
pub struct PostgresServiceRepository {
    pool: PgPool,
}

impl PostgresServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for the catalogue
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS service_categories (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NULL,
                is_active BOOLEAN NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create categories table: {}", e))
        })?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS services (
                id UUID PRIMARY KEY,
                category_id UUID NOT NULL,
                name TEXT NOT NULL,
                description TEXT NULL,
                base_price DOUBLE PRECISION NOT NULL,
                is_active BOOLEAN NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create services table: {}", e))
        })?;

        Ok(())
    }

    fn map_service(row: &PgRow) -> Service {
        Service {
            id: ServiceId::from_uuid(row.get("id")),
            category_id: CategoryId::from_uuid(row.get("category_id")),
            name: row.get("name"),
            description: row.get("description"),
            base_price: row.get("base_price"),
            is_active: row.get("is_active"),
        }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepository {
    async fn save(&self, service: &Service) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (id, category_id, name, description, base_price, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                category_id = EXCLUDED.category_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                base_price = EXCLUDED.base_price,
                is_active = EXCLUDED.is_active
        "#,
        )
        .bind(service.id.as_uuid())
        .bind(service.category_id.as_uuid())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.base_price)
        .bind(service.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to save service: {}", e)))?;

        Ok(())
    }

    async fn save_category(&self, category: &ServiceCategory) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO service_categories (id, name, description, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                is_active = EXCLUDED.is_active
        "#,
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to save category: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ServiceId) -> DomainResult<Option<Service>> {
        let row = sqlx::query("SELECT * FROM services WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get service: {}", e)))?;

        Ok(row.as_ref().map(Self::map_service))
    }

    async fn list(&self, category_id: Option<&CategoryId>) -> DomainResult<Vec<Service>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM services
            WHERE is_active AND ($1::uuid IS NULL OR category_id = $1)
            ORDER BY name
        "#,
        )
        .bind(category_id.map(|c| c.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to list services: {}", e)))?;

        Ok(rows.iter().map(Self::map_service).collect())
    }

    async fn list_categories(&self) -> DomainResult<Vec<ServiceCategory>> {
        let rows = sqlx::query("SELECT * FROM service_categories WHERE is_active ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::Infrastructure(format!("failed to list categories: {}", e))
            })?;

        Ok(rows
            .iter()
            .map(|row| ServiceCategory {
                id: CategoryId::from_uuid(row.get("id")),
                name: row.get("name"),
                description: row.get("description"),
                is_active: row.get("is_active"),
            })
            .collect())
    }
}
