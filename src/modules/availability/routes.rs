use axum::{routing::get, Router};

use super::handlers::list_available_slots;
use crate::app_state::AppState;

pub fn availability_routes() -> Router<AppState> {
    Router::new().route("/availability", get(list_available_slots))
}
