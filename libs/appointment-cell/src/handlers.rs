// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};
use tracing::debug;

use auth_cell::AuthorizationGate;
use shared_database::AppState;
use shared_models::appointment::NewAppointment;
use shared_models::auth::Role;
use shared_models::error::AppError;

use crate::models::{
    AppointmentListResponse, BookAppointmentRequest, DoctorNameScheduleQuery,
    DoctorScheduleQuery, UpdateAppointmentRequest,
};
use crate::services::{AppointmentBookingService, AppointmentQueryService};

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient_id = AuthorizationGate::new(&state).require_patient(auth.token()).await?;

    let appointment = NewAppointment {
        doctor_id: request.doctor_id,
        patient_id,
        appointment_time: request.appointment_time,
    };

    let booked = AppointmentBookingService::new(&state)
        .book_validated(appointment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment booked successfully",
            "appointment": booked
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = AuthorizationGate::new(&state).require_patient(auth.token()).await?;

    let updated = NewAppointment {
        doctor_id: request.doctor_id,
        patient_id: request.patient_id.unwrap_or(patient_id),
        appointment_time: request.appointment_time,
    };

    let appointment = AppointmentBookingService::new(&state)
        .update(appointment_id, updated, patient_id)
        .await?;

    Ok(Json(json!({
        "message": "Appointment updated successfully",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let patient_id = AuthorizationGate::new(&state).require_patient(auth.token()).await?;

    AppointmentBookingService::new(&state)
        .cancel(appointment_id, patient_id)
        .await?;

    Ok(Json(json!({
        "message": "Appointment cancelled successfully"
    })))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_own_schedule(
    State(state): State<AppState>,
    Query(query): Query<DoctorScheduleQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    let doctor_id = AuthorizationGate::new(&state).require_doctor(auth.token()).await?;
    debug!("Doctor {} listing appointments for {}", doctor_id, query.date);

    let appointments = AppointmentQueryService::new(&state)
        .list_for_doctor_id(doctor_id, query.date, query.pname.as_deref())
        .await?;

    Ok(Json(AppointmentListResponse { appointments }))
}

#[axum::debug_handler]
pub async fn finalize_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = AuthorizationGate::new(&state).require_doctor(auth.token()).await?;

    let appointment = AppointmentBookingService::new(&state)
        .finalize(appointment_id, doctor_id)
        .await?;

    Ok(Json(json!({
        "message": "Appointment finalized",
        "appointment": appointment
    })))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_schedule_by_doctor_name(
    State(state): State<AppState>,
    Query(query): Query<DoctorNameScheduleQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    AuthorizationGate::new(&state)
        .require_role(auth.token(), Role::Admin)
        .await?;

    let appointments = AppointmentQueryService::new(&state)
        .list_for_doctor(&query.doctor, query.date, query.pname.as_deref())
        .await?;

    Ok(Json(AppointmentListResponse { appointments }))
}
