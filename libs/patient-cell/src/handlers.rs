use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use appointment_cell::AppointmentQueryService;
use auth_cell::AuthorizationGate;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientAppointmentFilter};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = PatientService::new(&state).register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Signup successful",
            "patient": patient
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_own_details(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let patient_id = AuthorizationGate::new(&state).require_patient(auth.token()).await?;

    let patient = PatientService::new(&state).get_patient(patient_id).await?;

    Ok(Json(json!({ "patient": patient })))
}

#[axum::debug_handler]
pub async fn filter_own_appointments(
    State(state): State<AppState>,
    Query(filter): Query<PatientAppointmentFilter>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let patient_id = AuthorizationGate::new(&state).require_patient(auth.token()).await?;

    let appointments = AppointmentQueryService::new(&state)
        .list_for_patient(patient_id, filter.condition.as_deref(), filter.name.as_deref())
        .await?;

    Ok(Json(json!({ "appointments": appointments })))
}
