use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlackoutKind {
    Day,
    Period,
    TimeWindow,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Blackout {
    pub id: Uuid,
    /// None means the blackout applies to every barber
    pub barber_id: Option<Uuid>,
    pub kind: BlackoutKind,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    #[serde(
        default,
        rename = "time_start",
        with = "crate::scheduling::slots::hhmm_opt_serde"
    )]
    pub time_start_min: Option<i64>,
    #[serde(
        default,
        rename = "time_end",
        with = "crate::scheduling::slots::hhmm_opt_serde"
    )]
    pub time_end_min: Option<i64>,
    pub active: bool,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blackout {
    /// Day and period blackouts block the whole day; time fields are ignored
    pub fn is_full_day(&self) -> bool {
        matches!(self.kind, BlackoutKind::Day | BlackoutKind::Period)
    }

    /// Whether this blackout blocks the [start, end) window. Half-open
    /// intervals: windows that merely touch do not block.
    pub fn blocks_window(&self, start_min: i64, end_min: i64) -> bool {
        match self.kind {
            BlackoutKind::Day | BlackoutKind::Period => true,
            BlackoutKind::TimeWindow => match (self.time_start_min, self.time_end_min) {
                (Some(block_start), Some(block_end)) => {
                    start_min < block_end && end_min > block_start
                }
                _ => false,
            },
        }
    }

    pub fn applies_to(&self, barber_id: Uuid) -> bool {
        self.barber_id.map_or(true, |b| b == barber_id)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewBlackout {
    pub barber_id: Option<Uuid>,
    pub kind: BlackoutKind,
    pub date_start: NaiveDate,
    pub date_end: Option<NaiveDate>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBlackoutPayload {
    pub kind: Option<BlackoutKind>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub active: Option<bool>,
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlackoutFilters {
    pub barber_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub kind: Option<BlackoutKind>,
}
