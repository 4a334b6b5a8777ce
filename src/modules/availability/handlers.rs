use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::scheduling::availability::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub barber_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub slots: Vec<String>,
}

/// Free slots for a barber (or any barber) on a date
pub async fn list_available_slots(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    if query.duration_minutes < 1 {
        return Err(AppError::Validation(
            "duration_minutes must be at least 1".into(),
        ));
    }

    let now = Local::now().naive_local();
    let slots = AvailabilityService::list_available_slots(
        &state.db,
        &state.env.shop,
        query.barber_id,
        query.date,
        query.duration_minutes,
        now,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        date: query.date,
        duration_minutes: query.duration_minutes,
        slots,
    }))
}
