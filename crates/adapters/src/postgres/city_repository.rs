//! PostgreSQL City Repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use zaintza_core::City;
use zaintza_ports::CityRepository;
use zaintza_shared_types::{CityId, DomainError, DomainResult};

#[derive(Debug)]
pub struct PostgresCityRepository {
    pool: PgPool,
}

impl PostgresCityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for cities
    pub async fn init_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                is_active BOOLEAN NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::Infrastructure(format!("failed to create cities table: {}", e))
        })?;

        Ok(())
    }

    fn map_row(row: &PgRow) -> City {
        City {
            id: CityId::from_uuid(row.get("id")),
            name: row.get("name"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            is_active: row.get("is_active"),
        }
    }
}

#[async_trait]
impl CityRepository for PostgresCityRepository {
    async fn save(&self, city: &City) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cities (id, name, latitude, longitude, is_active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                is_active = EXCLUDED.is_active
        "#,
        )
        .bind(city.id.as_uuid())
        .bind(&city.name)
        .bind(city.latitude)
        .bind(city.longitude)
        .bind(city.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("failed to save city: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CityId) -> DomainResult<Option<City>> {
        let row = sqlx::query("SELECT * FROM cities WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to get city: {}", e)))?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn list_active(&self) -> DomainResult<Vec<City>> {
        let rows = sqlx::query("SELECT * FROM cities WHERE is_active ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to list cities: {}", e)))?;

        Ok(rows.iter().map(Self::map_row).collect())
    }
}
