use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use shared_database::{AppState, IdentityStore};
use shared_models::auth::Role;
use shared_models::principal::Principal;
use shared_utils::jwt::{issue_token, validate_token_at};

use crate::models::AuthError;

/// Issues identity tokens and maps them back to principals.
///
/// Tokens only carry the subject identifier; which role a token may act as
/// is decided against the identity store on every check.
pub struct TokenService {
    secret: String,
    identities: Arc<dyn IdentityStore>,
}

impl TokenService {
    pub fn new(state: &AppState) -> Self {
        Self {
            secret: state.config.jwt_secret.clone(),
            identities: Arc::clone(&state.identities),
        }
    }

    pub fn issue(&self, identifier: &str) -> Result<String, AuthError> {
        self.issue_at(identifier, Utc::now())
    }

    pub fn issue_at(&self, identifier: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        Ok(issue_token(identifier, &self.secret, issued_at)?)
    }

    /// Returns the token's subject if the signature and expiry check out.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        Ok(validate_token_at(token, &self.secret, now)?.sub)
    }

    /// Resolves the token to a principal of `role`. A valid token whose
    /// subject has no record under that role is rejected.
    #[instrument(skip(self, token))]
    pub async fn resolve(&self, token: &str, role: Role) -> Result<Principal, AuthError> {
        let subject = self.verify(token)?;

        self.identities
            .find_principal(role, &subject)
            .await?
            .ok_or_else(|| {
                debug!("No {} record for token subject {}", role, subject);
                AuthError::unauthorized()
            })
    }

    /// Fails closed: any verification or lookup problem yields `false`.
    pub async fn validate(&self, token: &str, role: Role) -> bool {
        match self.resolve(token, role).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Token rejected for role {}: {}", role, e);
                false
            }
        }
    }

    pub async fn resolve_patient_id(&self, token: &str) -> Option<i64> {
        self.resolve(token, Role::Patient).await.ok().map(|p| p.id())
    }

    pub async fn resolve_doctor_id(&self, token: &str) -> Option<i64> {
        self.resolve(token, Role::Doctor).await.ok().map(|p| p.id())
    }
}
