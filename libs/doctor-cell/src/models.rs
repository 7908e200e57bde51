use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::principal::Doctor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub available_times: Vec<String>,
}

/// Partial update. The email is the login identifier and cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub available_times: Option<Vec<String>>,
}

/// Half of the day a doctor publishes slots in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    Am,
    Pm,
}

impl DayPeriod {
    pub fn parse(raw: &str) -> Result<Self, DoctorError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(DayPeriod::Am),
            "PM" => Ok(DayPeriod::Pm),
            _ => Err(DoctorError::InvalidFilter("Invalid time filter: use 'AM' or 'PM'".to_string())),
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DayPeriod::Am => "AM",
            DayPeriod::Pm => "PM",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorFilterQuery {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor already exists")]
    AlreadyExists,

    #[error("{0}")]
    InvalidFilter(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Could not hash credential: {0}")]
    Credential(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::AlreadyExists => AppError::Conflict("Doctor already exists".to_string()),
            DoctorError::InvalidFilter(msg) => AppError::BadRequest(msg),
            DoctorError::ValidationError(msg) => AppError::BadRequest(msg),
            DoctorError::Credential(msg) => AppError::Internal(msg),
            DoctorError::Store(e) => AppError::store(e),
        }
    }
}
