use async_trait::async_trait;
use chrono::NaiveDateTime;

use shared_models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use shared_models::auth::Role;
use shared_models::principal::{Admin, Doctor, NewDoctor, NewPatient, Patient, Principal};

use crate::error::StoreError;

/// Durable records for admins, doctors and patients.
///
/// Lookups by identifier return `Ok(None)` when nothing matches; `Err` is
/// reserved for store faults.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError>;

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError>;

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError>;

    async fn find_patient_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<Patient>, StoreError>;

    async fn get_doctor(&self, id: i64) -> Result<Option<Doctor>, StoreError>;

    async fn get_patient(&self, id: i64) -> Result<Option<Patient>, StoreError>;

    /// All doctors ordered by ascending id.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;

    /// Doctors whose name contains `name`, case-insensitively, ordered by ascending id.
    async fn find_doctors_by_name(&self, name: &str) -> Result<Vec<Doctor>, StoreError>;

    /// Persists a doctor. `doctor.password` must already be hashed.
    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    /// Overwrites the doctor with the same id; `Ok(None)` when absent.
    async fn update_doctor(&self, doctor: Doctor) -> Result<Option<Doctor>, StoreError>;

    async fn delete_doctor(&self, id: i64) -> Result<bool, StoreError>;

    /// Persists a patient. `patient.password` must already be hashed.
    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError>;

    /// Resolves a principal of the given role by its identifier.
    async fn find_principal(&self, role: Role, identifier: &str) -> Result<Option<Principal>, StoreError> {
        let principal = match role {
            Role::Admin => self.find_admin_by_username(identifier).await?.map(Principal::Admin),
            Role::Doctor => self.find_doctor_by_email(identifier).await?.map(Principal::Doctor),
            Role::Patient => self.find_patient_by_email(identifier).await?.map(Principal::Patient),
        };
        Ok(principal)
    }
}

/// Durable storage for appointment records.
///
/// Implementations enforce uniqueness of `(doctor_id, appointment_time)` and
/// report violations as [`StoreError::Conflict`].
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Appointment>, StoreError>;

    /// Full overwrite of the record with `appointment.id`; `Ok(None)` when absent.
    async fn replace(&self, appointment: Appointment) -> Result<Option<Appointment>, StoreError>;

    async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<bool, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn delete_by_doctor(&self, doctor_id: i64) -> Result<usize, StoreError>;

    /// Appointments for a doctor with `start <= appointment_time <= end`,
    /// ordered by ascending time.
    async fn find_by_doctor_between(
        &self,
        doctor_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// A patient's appointments, optionally restricted to one status,
    /// ordered by ascending time.
    async fn find_by_patient(
        &self,
        patient_id: i64,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError>;
}
