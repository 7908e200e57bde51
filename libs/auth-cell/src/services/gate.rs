use tracing::{debug, warn};

use shared_database::AppState;
use shared_models::appointment::Appointment;
use shared_models::auth::Role;

use crate::models::AuthError;
use crate::services::token::TokenService;

/// Single entry point every protected operation calls before touching data.
pub struct AuthorizationGate {
    tokens: TokenService,
}

impl AuthorizationGate {
    pub fn new(state: &AppState) -> Self {
        Self {
            tokens: TokenService::new(state),
        }
    }

    pub async fn require_role(&self, token: &str, role: Role) -> Result<(), AuthError> {
        if self.tokens.validate(token, role).await {
            Ok(())
        } else {
            Err(AuthError::unauthorized())
        }
    }

    /// Role check plus the caller's patient id.
    pub async fn require_patient(&self, token: &str) -> Result<i64, AuthError> {
        self.tokens
            .resolve_patient_id(token)
            .await
            .ok_or_else(AuthError::unauthorized)
    }

    /// Role check plus the caller's doctor id.
    pub async fn require_doctor(&self, token: &str) -> Result<i64, AuthError> {
        self.tokens
            .resolve_doctor_id(token)
            .await
            .ok_or_else(AuthError::unauthorized)
    }

    /// Only the patient who holds the appointment may act on it.
    pub async fn require_ownership(&self, token: &str, appointment: &Appointment) -> Result<(), AuthError> {
        let patient_id = match self.tokens.resolve_patient_id(token).await {
            Some(id) => id,
            None => {
                debug!("Ownership check for appointment {} without a patient token", appointment.id);
                return Err(AuthError::Forbidden("You are not authorized to access this appointment".to_string()));
            }
        };

        if patient_id != appointment.patient_id {
            warn!(
                "Patient {} attempted to act on appointment {} owned by patient {}",
                patient_id, appointment.id, appointment.patient_id
            );
            return Err(AuthError::Forbidden("You are not authorized to access this appointment".to_string()));
        }

        Ok(())
    }
}
