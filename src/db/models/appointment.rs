use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

use super::service::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Legal transitions of the appointment state machine:
    /// pending -> confirmed -> completed, with cancelled reachable from
    /// pending or confirmed. Completed and cancelled are terminal.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Confirmed)
                | (AppointmentStatus::Pending, AppointmentStatus::Cancelled)
                | (AppointmentStatus::Confirmed, AppointmentStatus::Completed)
                | (AppointmentStatus::Confirmed, AppointmentStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub barber_id: Uuid,
    /// First booked service, kept for backward compatibility with
    /// single-service clients; the full list lives in appointment_services.
    pub service_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(rename = "start", with = "crate::scheduling::slots::hhmm_serde")]
    pub start_min: i64,
    #[serde(rename = "end", with = "crate::scheduling::slots::hhmm_serde")]
    pub end_min: i64,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAppointment {
    pub customer_id: Uuid,
    pub barber_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one service must be selected"))]
    pub service_ids: Vec<Uuid>,
    pub date: NaiveDate,
    pub start: String,
    pub end: Option<String>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelAppointmentPayload {
    pub customer_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentStatusPayload {
    pub status: AppointmentStatus,
}

#[derive(Debug, Serialize)]
pub struct AppointmentWithServices {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub services: Vec<Service>,
}
