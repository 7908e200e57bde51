use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use shared_database::{AppState, AppointmentStore, IdentityStore};
use shared_models::appointment::day_bounds;
use shared_models::principal::Doctor;

use crate::models::DoctorError;
use crate::services::slots::subtract_booked;

/// Free slots of a doctor on a date: published labels minus booked times.
pub struct AvailabilityService {
    identities: Arc<dyn IdentityStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
            appointments: Arc::clone(&state.appointments),
        }
    }

    /// Empty for an unknown doctor.
    pub async fn availability(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<String>, DoctorError> {
        self.availability_for_id(doctor_id, date, None).await
    }

    /// Same as [`availability`](Self::availability), but the booking held by
    /// `appointment_id` does not occupy its slot.
    pub async fn availability_excluding(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        appointment_id: i64,
    ) -> Result<Vec<String>, DoctorError> {
        self.availability_for_id(doctor_id, date, Some(appointment_id)).await
    }

    async fn availability_for_id(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        exclude: Option<i64>,
    ) -> Result<Vec<String>, DoctorError> {
        match self.identities.get_doctor(doctor_id).await? {
            Some(doctor) => self.free_slots(&doctor, date, exclude).await,
            None => {
                debug!("Availability requested for unknown doctor {}", doctor_id);
                Ok(Vec::new())
            }
        }
    }

    /// Free slots for an already loaded doctor record.
    pub async fn free_slots(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        exclude: Option<i64>,
    ) -> Result<Vec<String>, DoctorError> {
        let (start, end) = day_bounds(date);
        let booked: Vec<NaiveTime> = self
            .appointments
            .find_by_doctor_between(doctor.id, start, end)
            .await?
            .into_iter()
            .filter(|a| Some(a.id) != exclude)
            .map(|a| a.time_of_day())
            .collect();

        let free = subtract_booked(&doctor.available_times, &booked);
        debug!(
            "Doctor {} on {}: {} published, {} booked, {} free",
            doctor.id,
            date,
            doctor.available_times.len(),
            booked.len(),
            free.len()
        );
        Ok(free)
    }
}
