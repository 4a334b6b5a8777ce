use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{Blackout, BlackoutFilters, BlackoutKind, NewBlackout, UpdateBlackoutPayload};
use crate::db::repositories::BlackoutRepository;
use crate::error::{AppError, AppResult};
use crate::scheduling::slots;

pub struct BlackoutService;

impl BlackoutService {
    /// Whether the barber is blocked on the date. Without a window only
    /// full-day blackouts count; with one, time-window blackouts block on
    /// half-open overlap and full-day blackouts block unconditionally.
    pub async fn is_blocked(
        pool: &SqlitePool,
        barber_id: Uuid,
        date: NaiveDate,
        window: Option<(i64, i64)>,
    ) -> AppResult<bool> {
        let covering = BlackoutRepository::find_covering(pool, Some(barber_id), date).await?;
        let blocked = match window {
            Some((start_min, end_min)) => {
                covering.iter().any(|b| b.blocks_window(start_min, end_min))
            }
            None => covering.iter().any(Blackout::is_full_day),
        };
        Ok(blocked)
    }

    pub async fn create(pool: &SqlitePool, payload: NewBlackout) -> AppResult<Blackout> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let date_end = payload.date_end.unwrap_or(payload.date_start);
        if date_end < payload.date_start {
            return Err(AppError::Validation(
                "date_end must not precede date_start".into(),
            ));
        }
        let (time_start_min, time_end_min) = resolve_window(
            payload.kind,
            payload.time_start.as_deref(),
            payload.time_end.as_deref(),
        )?;

        let now = Utc::now();
        let blackout = Blackout {
            id: Uuid::new_v4(),
            barber_id: payload.barber_id,
            kind: payload.kind,
            date_start: payload.date_start,
            date_end,
            time_start_min,
            time_end_min,
            active: true,
            reason: payload.reason,
            created_at: now,
            updated_at: now,
        };

        Self::reject_overlapping(pool, &blackout, None).await?;
        BlackoutRepository::create(pool, &blackout).await?;
        Ok(blackout)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: UpdateBlackoutPayload,
    ) -> AppResult<Blackout> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut blackout = BlackoutRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blackout {id} not found")))?;

        if let Some(kind) = payload.kind {
            blackout.kind = kind;
        }
        if let Some(date_start) = payload.date_start {
            blackout.date_start = date_start;
        }
        if let Some(date_end) = payload.date_end {
            blackout.date_end = date_end;
        }
        if blackout.date_end < blackout.date_start {
            return Err(AppError::Validation(
                "date_end must not precede date_start".into(),
            ));
        }

        let time_start_min = match payload.time_start.as_deref() {
            Some(raw) => Some(parse_time(raw)?),
            None => blackout.time_start_min,
        };
        let time_end_min = match payload.time_end.as_deref() {
            Some(raw) => Some(parse_time(raw)?),
            None => blackout.time_end_min,
        };
        let (time_start_min, time_end_min) =
            validate_window(blackout.kind, time_start_min, time_end_min)?;
        blackout.time_start_min = time_start_min;
        blackout.time_end_min = time_end_min;

        if let Some(active) = payload.active {
            blackout.active = active;
        }
        if let Some(reason) = payload.reason {
            blackout.reason = Some(reason);
        }
        blackout.updated_at = Utc::now();

        // Deactivated blackouts cannot conflict with anything
        if blackout.active {
            Self::reject_overlapping(pool, &blackout, Some(id)).await?;
        }
        BlackoutRepository::update(pool, &blackout).await?;
        Ok(blackout)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
        let deleted = BlackoutRepository::delete(pool, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Blackout {id} not found")));
        }
        Ok(())
    }

    pub async fn list_active(
        pool: &SqlitePool,
        filters: &BlackoutFilters,
    ) -> AppResult<Vec<Blackout>> {
        Ok(BlackoutRepository::list_active(pool, filters).await?)
    }

    /// A new or updated blackout must not overlap an existing active
    /// blackout of the same barber scope
    async fn reject_overlapping(
        pool: &SqlitePool,
        candidate: &Blackout,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = BlackoutRepository::find_scope_overlapping(
            pool,
            candidate.barber_id,
            candidate.date_start,
            candidate.date_end,
            exclude_id,
        )
        .await?;

        let conflict = existing.iter().any(|other| {
            if candidate.is_full_day() || other.is_full_day() {
                return true;
            }
            match (candidate.time_start_min, candidate.time_end_min) {
                (Some(start), Some(end)) => other.blocks_window(start, end),
                _ => true,
            }
        });
        if conflict {
            return Err(AppError::Conflict(
                "An active blackout already covers this period".into(),
            ));
        }
        Ok(())
    }
}

fn parse_time(raw: &str) -> AppResult<i64> {
    slots::parse_hhmm(raw).ok_or_else(|| AppError::Validation(format!("Invalid time: {raw}")))
}

fn resolve_window(
    kind: BlackoutKind,
    time_start: Option<&str>,
    time_end: Option<&str>,
) -> AppResult<(Option<i64>, Option<i64>)> {
    let time_start = time_start.map(parse_time).transpose()?;
    let time_end = time_end.map(parse_time).transpose()?;
    validate_window(kind, time_start, time_end)
}

fn validate_window(
    kind: BlackoutKind,
    time_start: Option<i64>,
    time_end: Option<i64>,
) -> AppResult<(Option<i64>, Option<i64>)> {
    match kind {
        BlackoutKind::TimeWindow => match (time_start, time_end) {
            (Some(start), Some(end)) if start < end => Ok((Some(start), Some(end))),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "time_start must precede time_end".into(),
            )),
            _ => Err(AppError::Validation(
                "time_window blackouts require time_start and time_end".into(),
            )),
        },
        // Whole-day scopes ignore time fields
        BlackoutKind::Day | BlackoutKind::Period => Ok((None, None)),
    }
}
