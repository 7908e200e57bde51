use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{AppState, AppointmentStore, IdentityStore, StoreError};
use shared_models::principal::{Doctor, NewDoctor};
use shared_utils::password::hash_password;

use crate::models::{CreateDoctorRequest, DayPeriod, DoctorError, DoctorFilterQuery, UpdateDoctorRequest};
use crate::services::slots::SlotWindow;

pub struct DoctorService {
    identities: Arc<dyn IdentityStore>,
    appointments: Arc<dyn AppointmentStore>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Whether any published slot falls in `period`. Labels that do not parse
/// fall back to a plain keyword match.
fn publishes_in(doctor: &Doctor, period: DayPeriod) -> bool {
    doctor.available_times.iter().any(|label| match SlotWindow::parse(label) {
        Some(window) => window.is_morning() == (period == DayPeriod::Am),
        None => label.to_ascii_uppercase().contains(period.keyword()),
    })
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
            appointments: Arc::clone(&state.appointments),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.identities.list_doctors().await?)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        self.identities
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        let email = request.email.trim().to_string();
        if request.name.trim().is_empty() || email.is_empty() {
            return Err(DoctorError::ValidationError("Name and email are required".to_string()));
        }
        if request.password.is_empty() {
            return Err(DoctorError::ValidationError("Password is required".to_string()));
        }

        if self.identities.find_doctor_by_email(&email).await?.is_some() {
            warn!("Doctor with email {} already exists", email);
            return Err(DoctorError::AlreadyExists);
        }

        let password = hash_password(&request.password)
            .map_err(|e| DoctorError::Credential(e.to_string()))?;

        let doctor = self
            .identities
            .insert_doctor(NewDoctor {
                name: request.name.trim().to_string(),
                specialty: request.specialty.trim().to_string(),
                email,
                password,
                phone: request.phone.trim().to_string(),
                available_times: request.available_times,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => DoctorError::AlreadyExists,
                other => DoctorError::Store(other),
            })?;

        info!("Created doctor {} ({})", doctor.id, doctor.email);
        Ok(doctor)
    }

    pub async fn update_doctor(&self, doctor_id: i64, request: UpdateDoctorRequest) -> Result<Doctor, DoctorError> {
        let mut doctor = self.get_doctor(doctor_id).await?;

        if let Some(name) = request.name {
            doctor.name = name.trim().to_string();
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = specialty.trim().to_string();
        }
        if let Some(phone) = request.phone {
            doctor.phone = phone.trim().to_string();
        }
        if let Some(available_times) = request.available_times {
            doctor.available_times = available_times;
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            doctor.password = hash_password(&password)
                .map_err(|e| DoctorError::Credential(e.to_string()))?;
        }

        let updated = self
            .identities
            .update_doctor(doctor)
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Updated doctor {}", updated.id);
        Ok(updated)
    }

    /// Removes the doctor and every appointment booked with them. Returns
    /// the number of appointments removed.
    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<usize, DoctorError> {
        self.get_doctor(doctor_id).await?;

        let removed = self.appointments.delete_by_doctor(doctor_id).await?;
        if !self.identities.delete_doctor(doctor_id).await? {
            return Err(DoctorError::NotFound);
        }

        info!("Deleted doctor {} and {} appointments", doctor_id, removed);
        Ok(removed)
    }

    /// Every filter is optional: name is a case-insensitive substring,
    /// specialty a case-insensitive equality, time a morning/afternoon match
    /// on published slots.
    pub async fn filter_doctors(&self, query: &DoctorFilterQuery) -> Result<Vec<Doctor>, DoctorError> {
        let period = non_blank(&query.time).map(DayPeriod::parse).transpose()?;

        let doctors = match non_blank(&query.name) {
            Some(name) => self.identities.find_doctors_by_name(name).await?,
            None => self.identities.list_doctors().await?,
        };

        let specialty = non_blank(&query.specialty).map(str::to_lowercase);
        let doctors: Vec<Doctor> = doctors
            .into_iter()
            .filter(|d| specialty.as_ref().map_or(true, |s| d.specialty.to_lowercase() == *s))
            .filter(|d| period.map_or(true, |p| publishes_in(d, p)))
            .collect();

        debug!("Doctor filter {:?} matched {} doctors", query, doctors.len());
        Ok(doctors)
    }
}
