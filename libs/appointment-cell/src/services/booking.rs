// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::services::slots::offers_start;
use doctor_cell::AvailabilityService;
use shared_database::{AppState, AppointmentStore, IdentityStore, StoreError};
use shared_models::appointment::{Appointment, AppointmentStatus, NewAppointment};

use crate::models::{AppointmentError, BookingValidation};
use crate::services::lifecycle::AppointmentLifecycleService;

/// Booking, rescheduling, cancellation and status changes.
///
/// Callers are expected to have passed the authorization gate; the ids
/// handed in here are the caller's resolved principal ids.
pub struct AppointmentBookingService {
    identities: Arc<dyn IdentityStore>,
    appointments: Arc<dyn AppointmentStore>,
    availability_service: AvailabilityService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            identities: Arc::clone(&state.identities),
            appointments: Arc::clone(&state.appointments),
            availability_service: AvailabilityService::new(state),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Persists the appointment as scheduled. The store rejects a second
    /// booking of the same doctor and time.
    pub async fn book(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let booked = self.appointments.insert(appointment).await.map_err(|e| match e {
            StoreError::Conflict(msg) => {
                warn!("Booking lost the race for a slot: {}", msg);
                AppointmentError::SlotUnavailable
            }
            other => AppointmentError::BookingFailed(other.to_string()),
        })?;

        info!(
            "Booked appointment {} with doctor {} for patient {} at {}",
            booked.id, booked.doctor_id, booked.patient_id, booked.appointment_time
        );
        Ok(booked)
    }

    /// The doctor must exist and the requested time must start one of the
    /// doctor's free slots that day.
    pub async fn validate_booking(&self, appointment: &NewAppointment) -> Result<BookingValidation, AppointmentError> {
        self.check_slot(appointment, None).await
    }

    /// Validates then books.
    pub async fn book_validated(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        self.validate_booking(&appointment).await?.into_result()?;
        self.book(appointment).await
    }

    async fn check_slot(
        &self,
        appointment: &NewAppointment,
        exclude: Option<i64>,
    ) -> Result<BookingValidation, AppointmentError> {
        let doctor = match self.identities.get_doctor(appointment.doctor_id).await? {
            Some(doctor) => doctor,
            None => {
                debug!("Booking check for unknown doctor {}", appointment.doctor_id);
                return Ok(BookingValidation::DoctorNotFound);
            }
        };

        let free = self
            .availability_service
            .free_slots(&doctor, appointment.date(), exclude)
            .await?;

        if offers_start(&free, appointment.time_of_day()) {
            Ok(BookingValidation::Valid)
        } else {
            debug!(
                "Doctor {} has no free slot at {} (free: {:?})",
                doctor.id, appointment.appointment_time, free
            );
            Ok(BookingValidation::SlotUnavailable)
        }
    }

    /// Reschedules an appointment the caller owns. The new time is checked
    /// with the appointment's own current booking ignored.
    pub async fn update(
        &self,
        appointment_id: i64,
        updated: NewAppointment,
        caller_patient_id: i64,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if existing.patient_id != caller_patient_id || updated.patient_id != caller_patient_id {
            warn!(
                "Patient {} may not update appointment {} of patient {}",
                caller_patient_id, appointment_id, existing.patient_id
            );
            return Err(AppointmentError::Forbidden(
                "You are not authorized to update this appointment".to_string(),
            ));
        }

        if !self.lifecycle_service.is_mutable(existing.status) {
            return Err(AppointmentError::InvalidStatusTransition(existing.status));
        }

        self.check_slot(&updated, Some(appointment_id)).await?.into_result()?;

        let replacement = Appointment {
            id: appointment_id,
            doctor_id: updated.doctor_id,
            patient_id: updated.patient_id,
            appointment_time: updated.appointment_time,
            status: existing.status,
        };

        let saved = self
            .appointments
            .replace(replacement)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppointmentError::SlotUnavailable,
                other => AppointmentError::Store(other),
            })?
            .ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} moved to {}", saved.id, saved.appointment_time);
        Ok(saved)
    }

    /// Hard delete, only by the owning patient.
    pub async fn cancel(&self, appointment_id: i64, caller_patient_id: i64) -> Result<(), AppointmentError> {
        let existing = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if existing.patient_id != caller_patient_id {
            warn!(
                "Patient {} may not cancel appointment {} of patient {}",
                caller_patient_id, appointment_id, existing.patient_id
            );
            return Err(AppointmentError::Forbidden(
                "You are not authorized to cancel this appointment".to_string(),
            ));
        }

        if !self.lifecycle_service.is_mutable(existing.status) {
            return Err(AppointmentError::InvalidStatusTransition(existing.status));
        }

        match self.appointments.delete(appointment_id).await {
            Ok(true) => {
                info!("Appointment {} cancelled by patient {}", appointment_id, caller_patient_id);
                Ok(())
            }
            Ok(false) => Err(AppointmentError::NotFound),
            Err(e) => Err(AppointmentError::CancelFailed(e.to_string())),
        }
    }

    /// Unconditional status overwrite.
    pub async fn change_status(&self, appointment_id: i64, status: AppointmentStatus) -> Result<(), AppointmentError> {
        if !self.appointments.update_status(appointment_id, status).await? {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} status set to {}", appointment_id, status);
        Ok(())
    }

    /// Marks a scheduled appointment of the calling doctor as finalized.
    pub async fn finalize(&self, appointment_id: i64, caller_doctor_id: i64) -> Result<Appointment, AppointmentError> {
        let mut appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if appointment.doctor_id != caller_doctor_id {
            warn!(
                "Doctor {} may not finalize appointment {} of doctor {}",
                caller_doctor_id, appointment_id, appointment.doctor_id
            );
            return Err(AppointmentError::Forbidden(
                "You are not authorized to finalize this appointment".to_string(),
            ));
        }

        self.lifecycle_service
            .validate_status_transition(appointment.status, AppointmentStatus::Finalized)?;
        self.change_status(appointment_id, AppointmentStatus::Finalized).await?;

        appointment.status = AppointmentStatus::Finalized;
        Ok(appointment)
    }
}
