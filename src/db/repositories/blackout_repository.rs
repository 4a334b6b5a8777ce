use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{Blackout, BlackoutFilters};

const BLACKOUT_COLUMNS: &str = "id, barber_id, kind, date_start, date_end, time_start_min, time_end_min, active, reason, created_at, updated_at";

pub struct BlackoutRepository;

impl BlackoutRepository {
    pub async fn create(pool: &SqlitePool, blackout: &Blackout) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO blackouts (id, barber_id, kind, date_start, date_end, time_start_min, time_end_min, active, reason, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(blackout.id)
        .bind(blackout.barber_id)
        .bind(blackout.kind)
        .bind(blackout.date_start)
        .bind(blackout.date_end)
        .bind(blackout.time_start_min)
        .bind(blackout.time_end_min)
        .bind(blackout.active)
        .bind(blackout.reason.as_deref())
        .bind(blackout.created_at)
        .bind(blackout.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update(pool: &SqlitePool, blackout: &Blackout) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE blackouts
            SET kind = $1, date_start = $2, date_end = $3, time_start_min = $4,
                time_end_min = $5, active = $6, reason = $7, updated_at = $8
            WHERE id = $9
            "#,
        )
        .bind(blackout.kind)
        .bind(blackout.date_start)
        .bind(blackout.date_end)
        .bind(blackout.time_start_min)
        .bind(blackout.time_end_min)
        .bind(blackout.active)
        .bind(blackout.reason.as_deref())
        .bind(blackout.updated_at)
        .bind(blackout.id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blackouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Blackout>, sqlx::Error> {
        sqlx::query_as::<_, Blackout>(&format!(
            "SELECT {BLACKOUT_COLUMNS} FROM blackouts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Active blackouts matching the optional barber/date-range/kind
    /// filters, ordered by start date then start time. The barber filter
    /// includes shop-wide rows, which apply to every barber.
    pub async fn list_active(
        pool: &SqlitePool,
        filters: &BlackoutFilters,
    ) -> Result<Vec<Blackout>, sqlx::Error> {
        sqlx::query_as::<_, Blackout>(&format!(
            r#"
            SELECT {BLACKOUT_COLUMNS}
            FROM blackouts
            WHERE active = 1
              AND ($1 IS NULL OR barber_id IS NULL OR barber_id = $1)
              AND ($2 IS NULL OR date_end >= $2)
              AND ($3 IS NULL OR date_start <= $3)
              AND ($4 IS NULL OR kind = $4)
            ORDER BY date_start, COALESCE(time_start_min, -1)
            "#
        ))
        .bind(filters.barber_id)
        .bind(filters.date_from)
        .bind(filters.date_to)
        .bind(filters.kind)
        .fetch_all(pool)
        .await
    }

    /// Active blackouts whose date range covers the given date. With a
    /// barber the result includes shop-wide rows; with None it spans all
    /// barbers (used for no-preference availability).
    pub async fn find_covering(
        pool: &SqlitePool,
        barber_id: Option<Uuid>,
        date: NaiveDate,
    ) -> Result<Vec<Blackout>, sqlx::Error> {
        sqlx::query_as::<_, Blackout>(&format!(
            r#"
            SELECT {BLACKOUT_COLUMNS}
            FROM blackouts
            WHERE active = 1
              AND date_start <= $2
              AND date_end >= $2
              AND ($1 IS NULL OR barber_id IS NULL OR barber_id = $1)
            "#
        ))
        .bind(barber_id)
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Active blackouts of the exact same barber scope whose date range
    /// intersects the candidate range. Used to reject overlapping blackouts.
    pub async fn find_scope_overlapping(
        pool: &SqlitePool,
        barber_id: Option<Uuid>,
        date_start: NaiveDate,
        date_end: NaiveDate,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Blackout>, sqlx::Error> {
        sqlx::query_as::<_, Blackout>(&format!(
            r#"
            SELECT {BLACKOUT_COLUMNS}
            FROM blackouts
            WHERE active = 1
              AND barber_id IS $1
              AND date_start <= $3
              AND date_end >= $2
              AND ($4 IS NULL OR id != $4)
            "#
        ))
        .bind(barber_id)
        .bind(date_start)
        .bind(date_end)
        .bind(exclude_id)
        .fetch_all(pool)
        .await
    }
}
