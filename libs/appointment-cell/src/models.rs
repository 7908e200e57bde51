// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use doctor_cell::DoctorError;
use shared_database::StoreError;
use shared_models::appointment::{AppointmentDetails, AppointmentStatus};
use shared_models::error::AppError;

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

/// Booking payload. The patient is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    pub appointment_time: NaiveDateTime,
}

/// Full replacement of an appointment. `patient_id`, when present, must
/// name the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor_id: i64,
    pub patient_id: Option<i64>,
    pub appointment_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorScheduleQuery {
    pub date: NaiveDate,
    pub pname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorNameScheduleQuery {
    pub doctor: String,
    pub date: NaiveDate,
    pub pname: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentDetails>,
}

// ==============================================================================
// DOMAIN TYPES
// ==============================================================================

/// Outcome of checking a booking request against the doctor's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingValidation {
    Valid,
    DoctorNotFound,
    SlotUnavailable,
}

impl BookingValidation {
    pub fn into_result(self) -> Result<(), AppointmentError> {
        match self {
            BookingValidation::Valid => Ok(()),
            BookingValidation::DoctorNotFound => Err(AppointmentError::DoctorNotFound),
            BookingValidation::SlotUnavailable => Err(AppointmentError::SlotUnavailable),
        }
    }
}

/// Patient-side listing filter: `past` appointments are finalized, `future`
/// ones are still scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientCondition {
    Past,
    Future,
}

impl PatientCondition {
    /// Blank input means no filter.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, AppointmentError> {
        let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        if raw.eq_ignore_ascii_case("past") {
            Ok(Some(PatientCondition::Past))
        } else if raw.eq_ignore_ascii_case("future") {
            Ok(Some(PatientCondition::Future))
        } else {
            Err(AppointmentError::BadRequest(
                "Invalid condition: use 'past' or 'future'".to_string(),
            ))
        }
    }

    pub fn status(&self) -> AppointmentStatus {
        match self {
            PatientCondition::Past => AppointmentStatus::Finalized,
            PatientCondition::Future => AppointmentStatus::Scheduled,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor does not exist")]
    DoctorNotFound,

    #[error("Doctor not found")]
    NoMatchingDoctor,

    #[error("Time is unavailable")]
    SlotUnavailable,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Failed to book appointment: {0}")]
    BookingFailed(String),

    #[error("Failed to cancel appointment: {0}")]
    CancelFailed(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::Store(e) => AppointmentError::Store(e),
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            other => AppointmentError::BadRequest(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::DoctorNotFound => AppError::BadRequest("Doctor does not exist".to_string()),
            AppointmentError::NoMatchingDoctor => AppError::NotFound("Doctor not found".to_string()),
            AppointmentError::SlotUnavailable => AppError::BadRequest("Time is unavailable".to_string()),
            AppointmentError::Forbidden(msg) => AppError::Forbidden(msg),
            AppointmentError::BadRequest(msg) => AppError::BadRequest(msg),
            AppointmentError::InvalidStatusTransition(status) => {
                AppError::BadRequest(format!("Cannot transition from current status: {}", status))
            }
            AppointmentError::BookingFailed(cause) => {
                error!("Booking failed: {}", cause);
                AppError::Internal("Failed to book appointment".to_string())
            }
            AppointmentError::CancelFailed(cause) => {
                error!("Cancellation failed: {}", cause);
                AppError::Internal("Failed to cancel appointment".to_string())
            }
            AppointmentError::Store(e) => AppError::store(e),
        }
    }
}
