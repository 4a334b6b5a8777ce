use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{
    Appointment, AppointmentWithServices, CancelAppointmentPayload, NewAppointment,
    UpdateAppointmentStatusPayload,
};
use crate::error::{AppError, AppResult};
use crate::scheduling::booking::BookingService;

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub customer_id: Uuid,
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<NewAppointment>,
) -> AppResult<(StatusCode, Json<AppointmentWithServices>)> {
    let now = Local::now().naive_local();
    let appointment =
        BookingService::create_booking(&state.db, &state.env.shop, payload, now).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AppointmentWithServices>> {
    let appointment = BookingService::get(&state.db, id).await?;
    Ok(Json(appointment))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentListQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = BookingService::list_by_customer(&state.db, query.customer_id).await?;
    Ok(Json(appointments))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelAppointmentPayload>,
) -> AppResult<Json<Value>> {
    let cancelled = BookingService::cancel_booking(&state.db, id, payload.customer_id).await?;
    if !cancelled {
        return Err(AppError::NotFound(format!(
            "Appointment {id} not found or not cancellable"
        )));
    }
    Ok(Json(json!({ "cancelled": true })))
}

pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusPayload>,
) -> AppResult<Json<Appointment>> {
    let appointment = BookingService::update_status(&state.db, id, payload.status).await?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    BookingService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
