use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{AppState, IdentityStore, StoreError};
use shared_models::principal::{NewPatient, Patient};
use shared_utils::password::hash_password;

use crate::models::{CreatePatientRequest, PatientError};

pub struct PatientService {
    identities: Arc<dyn IdentityStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
        }
    }

    /// Registers a patient. Email and phone must both be unused.
    pub async fn register(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        let email = request.email.trim().to_string();
        let phone = request.phone.trim().to_string();
        debug!("Registering patient {}", email);

        if request.name.trim().is_empty() || email.is_empty() || phone.is_empty() {
            return Err(PatientError::ValidationError("Name, email and phone are required".to_string()));
        }
        if request.password.is_empty() {
            return Err(PatientError::ValidationError("Password is required".to_string()));
        }

        if self.identities.find_patient_by_email_or_phone(&email, &phone).await?.is_some() {
            warn!("Patient with email {} or phone {} already exists", email, phone);
            return Err(PatientError::AlreadyExists);
        }

        let password = hash_password(&request.password)
            .map_err(|e| PatientError::Credential(e.to_string()))?;

        let patient = self
            .identities
            .insert_patient(NewPatient {
                name: request.name.trim().to_string(),
                email,
                password,
                phone,
                address: request.address.trim().to_string(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => PatientError::AlreadyExists,
                other => PatientError::Store(other),
            })?;

        info!("Registered patient {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        self.identities
            .get_patient(patient_id)
            .await?
            .ok_or(PatientError::NotFound)
    }
}
