use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use urlencoding::encode;

use shared_models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use shared_models::principal::{Admin, Doctor, NewDoctor, NewPatient, Patient};

use crate::error::StoreError;
use crate::store::{AppointmentStore, IdentityStore};
use crate::supabase::SupabaseClient;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

async fn fetch_first<T: DeserializeOwned>(client: &SupabaseClient, path: &str) -> Result<Option<T>, StoreError> {
    let rows: Vec<T> = client.request(Method::GET, path, None).await?;
    Ok(rows.into_iter().next())
}

/// Identity records kept in the `admins`, `doctors` and `patients` tables.
pub struct PostgrestIdentityStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestIdentityStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl IdentityStore for PostgrestIdentityStore {
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let path = format!("/rest/v1/admins?username=eq.{}", encode(username));
        fetch_first(&self.supabase, &path).await
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?email=eq.{}", encode(email));
        fetch_first(&self.supabase, &path).await
    }

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let path = format!("/rest/v1/patients?email=eq.{}", encode(email));
        fetch_first(&self.supabase, &path).await
    }

    async fn find_patient_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<Patient>, StoreError> {
        if let Some(patient) = self.find_patient_by_email(email).await? {
            return Ok(Some(patient));
        }

        let path = format!("/rest/v1/patients?phone=eq.{}", encode(phone));
        fetch_first(&self.supabase, &path).await
    }

    async fn get_doctor(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        fetch_first(&self.supabase, &path).await
    }

    async fn get_patient(&self, id: i64) -> Result<Option<Patient>, StoreError> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        fetch_first(&self.supabase, &path).await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        self.supabase.request(Method::GET, "/rest/v1/doctors?order=id.asc", None).await
    }

    async fn find_doctors_by_name(&self, name: &str) -> Result<Vec<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?name=ilike.*{}*&order=id.asc", encode(name));
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let body = json!({
            "name": doctor.name,
            "specialty": doctor.specialty,
            "email": doctor.email,
            "password": doctor.password,
            "phone": doctor.phone,
            "available_times": doctor.available_times,
        });

        let rows: Vec<Doctor> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Request("Doctor insert returned no rows".to_string()))
    }

    async fn update_doctor(&self, doctor: Doctor) -> Result<Option<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor.id);
        let body = json!({
            "name": doctor.name,
            "specialty": doctor.specialty,
            "password": doctor.password,
            "phone": doctor.phone,
            "available_times": doctor.available_times,
        });

        let rows: Vec<Doctor> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(rows.into_iter().next())
    }

    async fn delete_doctor(&self, id: i64) -> Result<bool, StoreError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(!rows.is_empty())
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let body = json!({
            "name": patient.name,
            "email": patient.email,
            "password": patient.password,
            "phone": patient.phone,
            "address": patient.address,
        });

        let rows: Vec<Patient> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Request("Patient insert returned no rows".to_string()))
    }
}

/// Appointment records kept in the `appointments` table.
///
/// The table carries a unique index on `(doctor_id, appointment_time)`;
/// PostgREST reports violations as HTTP 409, surfaced as [`StoreError::Conflict`].
pub struct PostgrestAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let body = json!({
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "appointment_time": appointment.appointment_time.format(TIMESTAMP_FORMAT).to_string(),
            "status": i32::from(AppointmentStatus::Scheduled),
        });

        let rows: Vec<Appointment> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Request("Appointment insert returned no rows".to_string()))
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        fetch_first(&self.supabase, &path).await
    }

    async fn replace(&self, appointment: Appointment) -> Result<Option<Appointment>, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment.id);
        let body = json!({
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "appointment_time": appointment.appointment_time.format(TIMESTAMP_FORMAT).to_string(),
            "status": i32::from(appointment.status),
        });

        let rows: Vec<Appointment> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(rows.into_iter().next())
    }

    async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<bool, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(json!({ "status": i32::from(status) })),
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(!rows.is_empty())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(SupabaseClient::return_representation()),
        ).await?;

        Ok(!rows.is_empty())
    }

    async fn delete_by_doctor(&self, doctor_id: i64) -> Result<usize, StoreError> {
        let path = format!("/rest/v1/appointments?doctor_id=eq.{}", doctor_id);
        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(SupabaseClient::return_representation()),
        ).await?;

        debug!("Deleted {} appointments for doctor {}", rows.len(), doctor_id);
        Ok(rows.len())
    }

    async fn find_by_doctor_between(
        &self,
        doctor_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_time=gte.{}&appointment_time=lte.{}&order=appointment_time.asc",
            doctor_id,
            start.format(TIMESTAMP_FORMAT),
            end.format(TIMESTAMP_FORMAT),
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn find_by_patient(
        &self,
        patient_id: i64,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut path = format!("/rest/v1/appointments?patient_id=eq.{}", patient_id);
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", i32::from(status)));
        }
        path.push_str("&order=appointment_time.asc");

        self.supabase.request(Method::GET, &path, None).await
    }
}
