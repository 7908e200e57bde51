use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};
use tracing::debug;

use auth_cell::AuthorizationGate;
use shared_database::AppState;
use shared_models::auth::Role;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, DoctorFilterQuery, DoctorListResponse, UpdateDoctorRequest};
use crate::services::{AvailabilityService, DoctorService};

async fn require_admin(state: &AppState, token: &str) -> Result<(), AppError> {
    AuthorizationGate::new(state)
        .require_role(token, Role::Admin)
        .await
        .map_err(AppError::from)
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<DoctorListResponse>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;
    Ok(Json(DoctorListResponse { doctors }))
}

#[axum::debug_handler]
pub async fn filter_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorFilterQuery>,
) -> Result<Json<DoctorListResponse>, AppError> {
    let doctors = DoctorService::new(&state).filter_doctors(&query).await?;
    Ok(Json(DoctorListResponse { doctors }))
}

// ==============================================================================
// AUTHENTICATED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AppState>,
    Path((role, doctor_id, date)): Path<(String, i64, NaiveDate)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let role: Role = role.parse().map_err(AppError::BadRequest)?;

    AuthorizationGate::new(&state)
        .require_role(auth.token(), role)
        .await?;

    debug!("Availability for doctor {} on {} requested by {}", doctor_id, date, role);
    let available = AvailabilityService::new(&state)
        .availability(doctor_id, date)
        .await?;

    Ok(Json(json!({
        "message": "Availability fetched successfully",
        "doctor_id": doctor_id,
        "date": date,
        "availability": available
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&state, auth.token()).await?;

    let doctor = DoctorService::new(&state).create_doctor(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Doctor added to db",
            "doctor": doctor
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, auth.token()).await?;

    let doctor = DoctorService::new(&state).update_doctor(doctor_id, request).await?;

    Ok(Json(json!({
        "message": "Doctor updated",
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, auth.token()).await?;

    let removed = DoctorService::new(&state).delete_doctor(doctor_id).await?;

    Ok(Json(json!({
        "message": "Doctor deleted successfully",
        "appointments_removed": removed
    })))
}
