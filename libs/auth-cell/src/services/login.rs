use std::sync::Arc;

use tracing::{debug, error, info};

use shared_database::{AppState, IdentityStore};
use shared_models::auth::Role;
use shared_utils::password::verify_password;

use crate::models::AuthError;
use crate::services::token::TokenService;

/// Credential login for all three roles.
pub struct LoginService {
    identities: Arc<dyn IdentityStore>,
    tokens: TokenService,
}

impl LoginService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
            tokens: TokenService::new(state),
        }
    }

    pub async fn login(&self, role: Role, identifier: &str, password: &str) -> Result<String, AuthError> {
        let principal = self
            .identities
            .find_principal(role, identifier)
            .await?
            .ok_or_else(|| {
                debug!("Login for unknown {} {}", role, identifier);
                AuthError::InvalidCredentials
            })?;

        let matches = verify_password(password, principal.credential()).unwrap_or_else(|e| {
            error!("Stored credential for {} {} is unreadable: {}", role, identifier, e);
            false
        });
        if !matches {
            debug!("Password mismatch for {} {}", role, identifier);
            return Err(AuthError::InvalidCredentials);
        }

        info!("{} {} logged in", role, identifier);
        self.tokens.issue(principal.identifier())
    }
}
