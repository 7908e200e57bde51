// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::appointment::AppointmentStatus;

use crate::models::AppointmentError;

/// Status machine for persisted appointments. Cancellation deletes the
/// record and is not a status.
#[derive(Debug, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition(current_status));
        }

        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![AppointmentStatus::Finalized],
            // Terminal
            AppointmentStatus::Finalized => vec![],
        }
    }

    /// Only scheduled appointments can be rescheduled or cancelled.
    pub fn is_mutable(&self, current_status: AppointmentStatus) -> bool {
        current_status == AppointmentStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_can_only_become_finalized() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Scheduled, AppointmentStatus::Finalized)
            .is_ok());
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Scheduled, AppointmentStatus::Scheduled)
            .is_err());
    }

    #[test]
    fn finalized_is_terminal() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle.get_valid_transitions(AppointmentStatus::Finalized).is_empty());
        assert!(matches!(
            lifecycle.validate_status_transition(AppointmentStatus::Finalized, AppointmentStatus::Scheduled),
            Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Finalized))
        ));
    }
}
