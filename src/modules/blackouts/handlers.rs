use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{Blackout, BlackoutFilters, NewBlackout, UpdateBlackoutPayload};
use crate::error::AppResult;
use crate::scheduling::blackouts::BlackoutService;

pub async fn create_blackout(
    State(state): State<AppState>,
    Json(payload): Json<NewBlackout>,
) -> AppResult<(StatusCode, Json<Blackout>)> {
    let blackout = BlackoutService::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(blackout)))
}

pub async fn list_blackouts(
    State(state): State<AppState>,
    Query(filters): Query<BlackoutFilters>,
) -> AppResult<Json<Vec<Blackout>>> {
    let blackouts = BlackoutService::list_active(&state.db, &filters).await?;
    Ok(Json(blackouts))
}

pub async fn update_blackout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlackoutPayload>,
) -> AppResult<Json<Blackout>> {
    let blackout = BlackoutService::update(&state.db, id, payload).await?;
    Ok(Json(blackout))
}

pub async fn delete_blackout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    BlackoutService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
