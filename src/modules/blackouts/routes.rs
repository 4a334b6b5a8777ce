use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{create_blackout, delete_blackout, list_blackouts, update_blackout};
use crate::app_state::AppState;

pub fn blackout_routes() -> Router<AppState> {
    Router::new()
        .route("/blackouts", post(create_blackout))
        .route("/blackouts", get(list_blackouts))
        .route("/blackouts/:id", put(update_blackout))
        .route("/blackouts/:id", delete(delete_blackout))
}
