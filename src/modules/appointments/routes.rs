use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    cancel_appointment, create_appointment, delete_appointment, get_appointment,
    list_appointments, update_appointment_status,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(create_appointment))
        .route("/appointments", get(list_appointments))
        .route("/appointments/:id", get(get_appointment))
        .route("/appointments/:id", delete(delete_appointment))
        .route("/appointments/:id/cancel", put(cancel_appointment))
        .route("/appointments/:id/status", put(update_appointment_status))
}
