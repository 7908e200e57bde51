use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use shared_models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use shared_models::principal::{Admin, Doctor, NewDoctor, NewPatient, Patient};

use crate::error::StoreError;
use crate::store::{AppointmentStore, IdentityStore};

#[derive(Default)]
struct IdentityTables {
    next_id: i64,
    admins: BTreeMap<i64, Admin>,
    doctors: BTreeMap<i64, Doctor>,
    patients: BTreeMap<i64, Patient>,
}

impl IdentityTables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local identity store, used for local runs and tests.
#[derive(Default)]
pub struct MemoryIdentityStore {
    tables: RwLock<IdentityTables>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admins are provisioned out of band; there is no admin registration flow.
    pub async fn insert_admin(&self, username: &str, password_hash: &str) -> Result<Admin, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.admins.values().any(|a| a.username == username) {
            return Err(StoreError::Conflict(format!("admin {} already exists", username)));
        }

        let admin = Admin {
            id: tables.next_id(),
            username: username.to_string(),
            password: password_hash.to_string(),
        };
        tables.admins.insert(admin.id, admin.clone());
        Ok(admin)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.values().find(|a| a.username == username).cloned())
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.doctors.values().find(|d| d.email == email).cloned())
    }

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.values().find(|p| p.email == email).cloned())
    }

    async fn find_patient_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .patients
            .values()
            .find(|p| p.email == email || p.phone == phone)
            .cloned())
    }

    async fn get_doctor(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        Ok(self.tables.read().await.doctors.get(&id).cloned())
    }

    async fn get_patient(&self, id: i64) -> Result<Option<Patient>, StoreError> {
        Ok(self.tables.read().await.patients.get(&id).cloned())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.tables.read().await.doctors.values().cloned().collect())
    }

    async fn find_doctors_by_name(&self, name: &str) -> Result<Vec<Doctor>, StoreError> {
        let needle = name.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .doctors
            .values()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.doctors.values().any(|d| d.email == doctor.email) {
            return Err(StoreError::Conflict(format!("doctor {} already exists", doctor.email)));
        }

        let doctor = Doctor {
            id: tables.next_id(),
            name: doctor.name,
            specialty: doctor.specialty,
            email: doctor.email,
            password: doctor.password,
            phone: doctor.phone,
            available_times: doctor.available_times,
        };
        tables.doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn update_doctor(&self, doctor: Doctor) -> Result<Option<Doctor>, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.doctors.get_mut(&doctor.id) {
            Some(existing) => {
                *existing = doctor.clone();
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    async fn delete_doctor(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.doctors.remove(&id).is_some())
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.patients.values().any(|p| p.email == patient.email) {
            return Err(StoreError::Conflict(format!("patient {} already exists", patient.email)));
        }

        let patient = Patient {
            id: tables.next_id(),
            name: patient.name,
            email: patient.email,
            password: patient.password,
            phone: patient.phone,
            address: patient.address,
        };
        tables.patients.insert(patient.id, patient.clone());
        Ok(patient)
    }
}

#[derive(Default)]
struct AppointmentTable {
    next_id: i64,
    rows: BTreeMap<i64, Appointment>,
}

impl AppointmentTable {
    fn slot_taken(&self, doctor_id: i64, time: NaiveDateTime, except: Option<i64>) -> bool {
        self.rows.values().any(|a| {
            a.doctor_id == doctor_id && a.appointment_time == time && Some(a.id) != except
        })
    }
}

/// Process-local appointment store. The `(doctor_id, appointment_time)`
/// uniqueness check and the write happen under one write lock.
#[derive(Default)]
pub struct MemoryAppointmentStore {
    table: RwLock<AppointmentTable>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sorted_by_time(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by(|a, b| a.appointment_time.cmp(&b.appointment_time).then(a.id.cmp(&b.id)));
    appointments
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let mut table = self.table.write().await;
        if table.slot_taken(appointment.doctor_id, appointment.appointment_time, None) {
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked at {}",
                appointment.doctor_id, appointment.appointment_time
            )));
        }

        table.next_id += 1;
        let record = Appointment {
            id: table.next_id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_time: appointment.appointment_time,
            status: AppointmentStatus::Scheduled,
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn replace(&self, appointment: Appointment) -> Result<Option<Appointment>, StoreError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&appointment.id) {
            return Ok(None);
        }
        if table.slot_taken(appointment.doctor_id, appointment.appointment_time, Some(appointment.id)) {
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked at {}",
                appointment.doctor_id, appointment.appointment_time
            )));
        }

        table.rows.insert(appointment.id, appointment.clone());
        Ok(Some(appointment))
    }

    async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(record) => {
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn delete_by_doctor(&self, doctor_id: i64) -> Result<usize, StoreError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, a| a.doctor_id != doctor_id);
        Ok(before - table.rows.len())
    }

    async fn find_by_doctor_between(
        &self,
        doctor_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        let table = self.table.read().await;
        let matches = table
            .rows
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.appointment_time >= start && a.appointment_time <= end)
            .cloned()
            .collect();
        Ok(sorted_by_time(matches))
    }

    async fn find_by_patient(
        &self,
        patient_id: i64,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let table = self.table.read().await;
        let matches = table
            .rows
            .values()
            .filter(|a| a.patient_id == patient_id && status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        Ok(sorted_by_time(matches))
    }
}
