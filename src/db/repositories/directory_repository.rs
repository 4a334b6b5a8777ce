use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{Barber, Customer, Service};

/// Read-only lookups against the directories the scheduling core consumes:
/// the service catalog and the barber and customer registries.
pub struct DirectoryRepository;

impl DirectoryRepository {
    pub async fn get_service(pool: &SqlitePool, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT id, name, duration_minutes, price_cents, active, created_at, updated_at FROM services WHERE id = $1 AND active = 1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_barbers(pool: &SqlitePool) -> Result<Vec<Barber>, sqlx::Error> {
        sqlx::query_as::<_, Barber>(
            "SELECT id, name, active, created_at, updated_at FROM barbers WHERE active = 1 ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn barber_exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM barbers WHERE id = $1 AND active = 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn get_customer(pool: &SqlitePool, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn customer_exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(Self::get_customer(pool, id).await?.is_some())
    }
}
