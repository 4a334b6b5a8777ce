use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus, Service};

const APPOINTMENT_COLUMNS: &str = "id, customer_id, barber_id, service_id, date, start_min, end_min, notes, status, created_at, updated_at";

pub struct AppointmentRepository;

impl AppointmentRepository {
    /// Insert the appointment header inside the caller's transaction. The
    /// partial unique index on (barber_id, date, start_min) surfaces races
    /// as a unique violation here.
    pub async fn create(
        tx: &mut Transaction<'_, Sqlite>,
        appointment: &Appointment,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO appointments (id, customer_id, barber_id, service_id, date, start_min, end_min, notes, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.customer_id)
        .bind(appointment.barber_id)
        .bind(appointment.service_id)
        .bind(appointment.date)
        .bind(appointment.start_min)
        .bind(appointment.end_min)
        .bind(appointment.notes.as_deref())
        .bind(appointment.status)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Insert one association row per requested service, preserving order
    pub async fn add_services(
        tx: &mut Transaction<'_, Sqlite>,
        appointment_id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        for (position, service_id) in service_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO appointment_services (appointment_id, service_id, position) VALUES ($1, $2, $3)",
            )
            .bind(appointment_id)
            .bind(service_id)
            .bind(position as i64)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Non-cancelled appointments for the barber and date whose [start, end)
    /// interval overlaps the query interval. Overlap is half-open: intervals
    /// that only touch do not conflict.
    pub async fn find_conflicting<'e, E>(
        executor: E,
        barber_id: Uuid,
        date: NaiveDate,
        start_min: i64,
        end_min: i64,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, customer_id, barber_id, service_id, date, start_min, end_min, notes, status, created_at, updated_at
            FROM appointments
            WHERE barber_id = $1
              AND date = $2
              AND status != 'cancelled'
              AND start_min < $3
              AND end_min > $4
              AND ($5 IS NULL OR id != $5)
            ORDER BY start_min
            "#,
        )
        .bind(barber_id)
        .bind(date)
        .bind(end_min)
        .bind(start_min)
        .bind(exclude_id)
        .fetch_all(executor)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_customer(
        pool: &SqlitePool,
        customer_id: Uuid,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE customer_id = $1 ORDER BY date DESC, start_min DESC"
        ))
        .bind(customer_id)
        .fetch_all(pool)
        .await
    }

    /// Non-cancelled appointments on a date, optionally narrowed to one
    /// barber. Used by the availability resolver to build occupancy.
    pub async fn list_for_date(
        pool: &SqlitePool,
        date: NaiveDate,
        barber_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments
            WHERE date = $1
              AND status != 'cancelled'
              AND ($2 IS NULL OR barber_id = $2)
            ORDER BY start_min
            "#
        ))
        .bind(date)
        .bind(barber_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
            SET status = $1, updated_at = $2
            WHERE id = $3
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Resolve the ordered service list attached to an appointment
    pub async fn services_for(
        pool: &SqlitePool,
        appointment_id: Uuid,
    ) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            SELECT s.id, s.name, s.duration_minutes, s.price_cents, s.active, s.created_at, s.updated_at
            FROM appointment_services aps
            JOIN services s ON s.id = aps.service_id
            WHERE aps.appointment_id = $1
            ORDER BY aps.position
            "#,
        )
        .bind(appointment_id)
        .fetch_all(pool)
        .await
    }
}
