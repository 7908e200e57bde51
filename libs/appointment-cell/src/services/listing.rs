// libs/appointment-cell/src/services/listing.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_database::{AppState, AppointmentStore, IdentityStore};
use shared_models::appointment::{day_bounds, Appointment, AppointmentDetails};
use shared_models::principal::{Doctor, Patient};

use crate::models::{AppointmentError, PatientCondition};

fn needle(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Read-side queries over appointments, returned as [`AppointmentDetails`].
pub struct AppointmentQueryService {
    identities: Arc<dyn IdentityStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl AppointmentQueryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
            appointments: Arc::clone(&state.appointments),
        }
    }

    /// A doctor's appointments on `date`, looked up by name. When several
    /// doctors match, the one with the lowest id is used. A blank name
    /// matches nobody.
    pub async fn list_for_doctor(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        patient_name: Option<&str>,
    ) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let name = needle(Some(doctor_name)).ok_or(AppointmentError::NoMatchingDoctor)?;
        let doctor = self
            .identities
            .find_doctors_by_name(&name)
            .await?
            .into_iter()
            .min_by_key(|d| d.id)
            .ok_or(AppointmentError::NoMatchingDoctor)?;

        debug!("Doctor name {:?} resolved to doctor {}", doctor_name, doctor.id);
        self.list_for_doctor_id(doctor.id, date, patient_name).await
    }

    pub async fn list_for_doctor_id(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        patient_name: Option<&str>,
    ) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let (start, end) = day_bounds(date);
        let appointments = self
            .appointments
            .find_by_doctor_between(doctor_id, start, end)
            .await?;

        let details = self.details(appointments).await?;
        Ok(match needle(patient_name) {
            Some(name) => details
                .into_iter()
                .filter(|d| d.patient_name.to_lowercase().contains(&name))
                .collect(),
            None => details,
        })
    }

    /// A patient's appointments in ascending time order, optionally narrowed
    /// by condition and by doctor name substring.
    pub async fn list_for_patient(
        &self,
        patient_id: i64,
        condition: Option<&str>,
        doctor_name: Option<&str>,
    ) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let condition = PatientCondition::parse(condition)?;

        let mut appointments = self
            .appointments
            .find_by_patient(patient_id, condition.map(|c| c.status()))
            .await?;
        appointments.sort_by_key(|a| (a.appointment_time, a.id));

        let details = self.details(appointments).await?;
        Ok(match needle(doctor_name) {
            Some(name) => details
                .into_iter()
                .filter(|d| d.doctor_name.to_lowercase().contains(&name))
                .collect(),
            None => details,
        })
    }

    /// Joins appointments with their doctor and patient records, looking each
    /// principal up once.
    pub async fn details(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let mut doctors: HashMap<i64, Option<Doctor>> = HashMap::new();
        let mut patients: HashMap<i64, Option<Patient>> = HashMap::new();

        for appointment in &appointments {
            if !doctors.contains_key(&appointment.doctor_id) {
                let doctor = self.identities.get_doctor(appointment.doctor_id).await?;
                doctors.insert(appointment.doctor_id, doctor);
            }
            if !patients.contains_key(&appointment.patient_id) {
                let patient = self.identities.get_patient(appointment.patient_id).await?;
                patients.insert(appointment.patient_id, patient);
            }
        }

        Ok(appointments
            .into_iter()
            .map(|a| {
                let doctor = doctors.get(&a.doctor_id).and_then(Option::as_ref);
                let patient = patients.get(&a.patient_id).and_then(Option::as_ref);
                if doctor.is_none() || patient.is_none() {
                    warn!("Appointment {} references a missing doctor or patient", a.id);
                }

                AppointmentDetails {
                    id: a.id,
                    doctor_id: a.doctor_id,
                    doctor_name: doctor.map(|d| d.name.clone()).unwrap_or_default(),
                    patient_id: a.patient_id,
                    patient_name: patient.map(|p| p.name.clone()).unwrap_or_default(),
                    patient_email: patient.map(|p| p.email.clone()).unwrap_or_default(),
                    patient_phone: patient.map(|p| p.phone.clone()).unwrap_or_default(),
                    patient_address: patient.map(|p| p.address.clone()).unwrap_or_default(),
                    appointment_time: a.appointment_time,
                    status: a.status,
                }
            })
            .collect())
    }
}
