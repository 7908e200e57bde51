use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientAppointmentFilter {
    pub condition: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient already exists")]
    AlreadyExists,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Could not hash credential: {0}")]
    Credential(String),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
            PatientError::AlreadyExists => {
                AppError::Conflict("Patient already exists".to_string())
            }
            PatientError::ValidationError(msg) => AppError::BadRequest(msg),
            PatientError::Credential(msg) => AppError::Internal(msg),
            PatientError::Store(e) => AppError::store(e),
        }
    }
}
