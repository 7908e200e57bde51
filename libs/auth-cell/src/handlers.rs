use axum::{
    extract::{Json, Path, State},
    http::HeaderMap,
};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{LoginRequest, Role, TokenResponse, TokenValidationResponse};
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;

use crate::services::{LoginService, TokenService};

fn parse_role(role: &str) -> Result<Role, AppError> {
    role.parse::<Role>().map_err(AppError::BadRequest)
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let role = parse_role(&role)?;
    debug!("Login attempt for {} {}", role, request.identifier);

    let token = LoginService::new(&state)
        .login(role, request.identifier.trim(), &request.password)
        .await?;

    Ok(Json(TokenResponse {
        token,
        role,
        message: "Login successful".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn validate_token(
    State(state): State<AppState>,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TokenValidationResponse>, AppError> {
    let role = parse_role(&role)?;
    let token = extract_bearer_token(&headers)?;

    if !TokenService::new(&state).validate(&token, role).await {
        return Err(AppError::Auth("Invalid or expired token".to_string()));
    }

    Ok(Json(TokenValidationResponse {
        valid: true,
        role,
        message: "Token is valid".to_string(),
    }))
}
