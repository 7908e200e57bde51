pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AppointmentError, BookingValidation, PatientCondition};
pub use services::{AppointmentBookingService, AppointmentLifecycleService, AppointmentQueryService};
