use chrono::{Datelike, NaiveDateTime, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::config::ShopConfig;
use crate::db::models::{
    Appointment, AppointmentStatus, AppointmentWithServices, NewAppointment,
};
use crate::db::repositories::{AppointmentRepository, DirectoryRepository};
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};
use crate::scheduling::availability::AvailabilityService;
use crate::scheduling::slots;

pub struct BookingService;

impl BookingService {
    /// Validate and atomically commit a multi-service booking. The
    /// availability pre-check gives fast, descriptive rejections; the
    /// transactional re-check and the unique slot index are what actually
    /// guarantee no double-booking under concurrency.
    pub async fn create_booking(
        pool: &SqlitePool,
        shop: &ShopConfig,
        payload: NewAppointment,
        now: NaiveDateTime,
    ) -> AppResult<AppointmentWithServices> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let start_min = slots::parse_hhmm(&payload.start)
            .ok_or_else(|| AppError::Validation(format!("Invalid start time: {}", payload.start)))?;

        let mut services = Vec::with_capacity(payload.service_ids.len());
        for service_id in &payload.service_ids {
            let service = DirectoryRepository::get_service(pool, *service_id)
                .await?
                .ok_or_else(|| AppError::Validation(format!("Unknown service: {service_id}")))?;
            services.push(service);
        }
        let total_duration: i64 = services.iter().map(|s| s.duration_minutes).sum();

        // The caller's explicit end time wins, but a mismatch against the
        // sum of service durations is worth a trace
        let computed_end = start_min + total_duration;
        let end_min = match payload.end.as_deref() {
            Some(raw) => {
                let supplied = slots::parse_hhmm(raw)
                    .ok_or_else(|| AppError::Validation(format!("Invalid end time: {raw}")))?;
                if supplied != computed_end {
                    warn!(
                        supplied = %slots::format_hhmm(supplied),
                        computed = %slots::format_hhmm(computed_end),
                        "booking end time differs from the sum of service durations"
                    );
                }
                supplied
            }
            None => computed_end,
        };
        if start_min >= end_min {
            return Err(AppError::Validation(
                "start time must precede end time".into(),
            ));
        }

        let Some((open_min, close_min)) = slots::hours_for(shop, payload.date.weekday()) else {
            return Err(AppError::Validation("The shop is closed on this date".into()));
        };
        if start_min < open_min || end_min > close_min {
            return Err(AppError::Validation(
                "The requested time is outside opening hours".into(),
            ));
        }

        let start_time = NaiveTime::from_hms_opt((start_min / 60) as u32, (start_min % 60) as u32, 0)
            .ok_or_else(|| AppError::Validation(format!("Invalid start time: {}", payload.start)))?;
        if payload.date.and_time(start_time) <= now {
            return Err(AppError::PastTime(format!("{} {}", payload.date, payload.start)));
        }

        if !DirectoryRepository::customer_exists(pool, payload.customer_id).await? {
            return Err(AppError::NotFound(format!(
                "Unknown customer: {}",
                payload.customer_id
            )));
        }

        let barber_id = match payload.barber_id {
            Some(id) => {
                if !DirectoryRepository::barber_exists(pool, id).await? {
                    return Err(AppError::NotFound(format!("Unknown barber: {id}")));
                }
                if !AvailabilityService::is_available(pool, id, payload.date, start_min, end_min, None)
                    .await?
                {
                    return Err(AppError::Conflict(
                        "The requested slot is not available".into(),
                    ));
                }
                id
            }
            None => Self::first_free_barber(pool, &payload, start_min, end_min).await?,
        };

        let now_utc = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_id: payload.customer_id,
            barber_id,
            service_id: payload.service_ids.first().copied(),
            date: payload.date,
            start_min,
            end_min,
            notes: payload.notes.clone(),
            status: AppointmentStatus::Pending,
            created_at: now_utc,
            updated_at: now_utc,
        };

        Self::commit(pool, &appointment, &payload.service_ids).await?;

        Ok(AppointmentWithServices {
            appointment,
            services,
        })
    }

    /// Cancel a customer's own appointment. Returns false when the
    /// appointment does not exist, belongs to someone else, or is already
    /// terminal; cancelling twice is a no-op, never a second transition.
    pub async fn cancel_booking(
        pool: &SqlitePool,
        appointment_id: Uuid,
        customer_id: Uuid,
    ) -> AppResult<bool> {
        let Some(appointment) = AppointmentRepository::find_by_id(pool, appointment_id).await? else {
            return Ok(false);
        };
        if appointment.customer_id != customer_id || appointment.status.is_terminal() {
            return Ok(false);
        }
        let updated =
            AppointmentRepository::update_status(pool, appointment_id, AppointmentStatus::Cancelled)
                .await?;
        Ok(updated.is_some())
    }

    /// Administrative status transition, restricted to the state machine
    pub async fn update_status(
        pool: &SqlitePool,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Appointment> {
        let appointment = AppointmentRepository::find_by_id(pool, appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {appointment_id} not found")))?;
        if !appointment.status.can_transition_to(status) {
            return Err(AppError::Validation(format!(
                "Cannot transition appointment from {} to {}",
                appointment.status.as_str(),
                status.as_str()
            )));
        }
        AppointmentRepository::update_status(pool, appointment_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {appointment_id} not found")))
    }

    /// Administrative hard delete; completed appointments are kept
    pub async fn delete(pool: &SqlitePool, appointment_id: Uuid) -> AppResult<()> {
        let appointment = AppointmentRepository::find_by_id(pool, appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {appointment_id} not found")))?;
        if appointment.status == AppointmentStatus::Completed {
            return Err(AppError::Validation(
                "Completed appointments cannot be deleted".into(),
            ));
        }
        AppointmentRepository::delete(pool, appointment_id).await?;
        Ok(())
    }

    pub async fn get(pool: &SqlitePool, appointment_id: Uuid) -> AppResult<AppointmentWithServices> {
        let appointment = AppointmentRepository::find_by_id(pool, appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {appointment_id} not found")))?;
        let services = AppointmentRepository::services_for(pool, appointment_id).await?;
        Ok(AppointmentWithServices {
            appointment,
            services,
        })
    }

    pub async fn list_by_customer(
        pool: &SqlitePool,
        customer_id: Uuid,
    ) -> AppResult<Vec<Appointment>> {
        Ok(AppointmentRepository::list_by_customer(pool, customer_id).await?)
    }

    /// "No preference" bookings take the first barber, in name order, who is
    /// free for the whole window
    async fn first_free_barber(
        pool: &SqlitePool,
        payload: &NewAppointment,
        start_min: i64,
        end_min: i64,
    ) -> AppResult<Uuid> {
        let barbers = DirectoryRepository::list_barbers(pool).await?;
        for barber in barbers {
            if AvailabilityService::is_available(pool, barber.id, payload.date, start_min, end_min, None)
                .await?
            {
                return Ok(barber.id);
            }
        }
        Err(AppError::Conflict(
            "No barber is available for the requested slot".into(),
        ))
    }

    /// Header and association rows commit or roll back as one unit. The
    /// header insert comes first so the write lock is taken before the
    /// overlap re-check runs on the same transaction.
    async fn commit(
        pool: &SqlitePool,
        appointment: &Appointment,
        service_ids: &[Uuid],
    ) -> AppResult<()> {
        let mut tx = pool.begin().await.map_err(map_commit_error)?;

        AppointmentRepository::create(&mut tx, appointment)
            .await
            .map_err(map_commit_error)?;

        let conflicts = AppointmentRepository::find_conflicting(
            &mut *tx,
            appointment.barber_id,
            appointment.date,
            appointment.start_min,
            appointment.end_min,
            Some(appointment.id),
        )
        .await
        .map_err(map_commit_error)?;
        if !conflicts.is_empty() {
            tx.rollback().await.map_err(map_commit_error)?;
            return Err(AppError::Conflict(
                "The requested slot is not available".into(),
            ));
        }

        AppointmentRepository::add_services(&mut tx, appointment.id, service_ids)
            .await
            .map_err(map_commit_error)?;

        tx.commit().await.map_err(map_commit_error)?;
        Ok(())
    }
}

/// A unique-index violation during the commit means another booking won the
/// slot; everything else is a storage failure.
fn map_commit_error(err: sqlx::Error) -> AppError {
    match DatabaseError::from(err) {
        DatabaseError::Duplicate => AppError::Conflict("The requested slot was just taken".into()),
        other => AppError::Database(other),
    }
}
