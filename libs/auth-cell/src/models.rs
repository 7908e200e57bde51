use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken(#[from] TokenError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Identity store unavailable: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized("Invalid or expired token".to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => AppError::Auth("Invalid or expired token".to_string()),
            AuthError::Unauthorized(msg) => AppError::Auth(msg),
            AuthError::Forbidden(msg) => AppError::Forbidden(msg),
            AuthError::InvalidCredentials => AppError::Auth("Invalid credentials".to_string()),
            AuthError::Store(e) => AppError::store(e),
        }
    }
}
