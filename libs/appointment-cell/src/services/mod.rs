pub mod booking;
pub mod lifecycle;
pub mod listing;

pub use booking::AppointmentBookingService;
pub use lifecycle::AppointmentLifecycleService;
pub use listing::AppointmentQueryService;
