pub mod availability;
pub mod doctor;
pub mod slots;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
