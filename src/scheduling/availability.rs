use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::ShopConfig;
use crate::db::models::{Appointment, Blackout};
use crate::db::repositories::{AppointmentRepository, BlackoutRepository, DirectoryRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::blackouts::BlackoutService;
use crate::scheduling::slots;

pub struct AvailabilityService;

impl AvailabilityService {
    /// Free HH:MM start times for a barber and date, for a booking of the
    /// given total duration. With no barber a slot is offered when at least
    /// one active barber is free for the whole window.
    pub async fn list_available_slots(
        pool: &SqlitePool,
        shop: &ShopConfig,
        barber_id: Option<Uuid>,
        date: NaiveDate,
        duration_minutes: i64,
        now: NaiveDateTime,
    ) -> AppResult<Vec<String>> {
        if date < now.date() {
            return Ok(Vec::new());
        }

        let Some((_, close_min)) = slots::hours_for(shop, date.weekday()) else {
            return Ok(Vec::new());
        };
        let candidates = slots::slots_for(shop, date);

        let barber_ids: Vec<Uuid> = match barber_id {
            Some(id) => {
                if !DirectoryRepository::barber_exists(pool, id).await? {
                    return Err(AppError::NotFound(format!("Unknown barber: {id}")));
                }
                vec![id]
            }
            None => DirectoryRepository::list_barbers(pool)
                .await?
                .into_iter()
                .map(|b| b.id)
                .collect(),
        };
        if barber_ids.is_empty() {
            return Ok(Vec::new());
        }

        let blackouts = BlackoutRepository::find_covering(pool, barber_id, date).await?;
        // A shop-wide full-day blackout empties the calendar outright; a
        // barber-specific one only removes that barber from the pool below
        if blackouts.iter().any(|b| b.barber_id.is_none() && b.is_full_day()) {
            return Ok(Vec::new());
        }
        if let Some(id) = barber_id {
            if blackouts.iter().any(|b| b.applies_to(id) && b.is_full_day()) {
                return Ok(Vec::new());
            }
        }

        let appointments = AppointmentRepository::list_for_date(pool, date, barber_id).await?;

        // Slots earlier than the current time never apply on today's date
        let now_min = if date == now.date() {
            Some(i64::from(now.time().num_seconds_from_midnight() / 60))
        } else {
            None
        };

        let mut free = Vec::new();
        for slot in candidates {
            let window_end = slot + duration_minutes;
            if window_end > close_min {
                continue;
            }
            if now_min.is_some_and(|m| slot <= m) {
                continue;
            }
            let available = barber_ids
                .iter()
                .any(|&barber| Self::barber_free(barber, slot, window_end, &blackouts, &appointments));
            if available {
                free.push(slots::format_hhmm(slot));
            }
        }
        Ok(free)
    }

    /// Single yes/no check for a concrete barber and [start, end) window:
    /// not blocked by a blackout and free of conflicting appointments.
    pub async fn is_available(
        pool: &SqlitePool,
        barber_id: Uuid,
        date: NaiveDate,
        start_min: i64,
        end_min: i64,
        exclude_appointment_id: Option<Uuid>,
    ) -> AppResult<bool> {
        if BlackoutService::is_blocked(pool, barber_id, date, Some((start_min, end_min))).await? {
            return Ok(false);
        }
        let conflicts = AppointmentRepository::find_conflicting(
            pool,
            barber_id,
            date,
            start_min,
            end_min,
            exclude_appointment_id,
        )
        .await?;
        Ok(conflicts.is_empty())
    }

    fn barber_free(
        barber: Uuid,
        start_min: i64,
        end_min: i64,
        blackouts: &[Blackout],
        appointments: &[Appointment],
    ) -> bool {
        let blocked = blackouts
            .iter()
            .filter(|b| b.applies_to(barber))
            .any(|b| b.blocks_window(start_min, end_min));
        if blocked {
            return false;
        }
        !appointments
            .iter()
            .filter(|a| a.barber_id == barber)
            .any(|a| slots::windows_overlap(start_min, end_min, a.start_min, a.end_min))
    }
}
