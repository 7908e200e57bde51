use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Appointment state as persisted: `0` scheduled, `1` finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum AppointmentStatus {
    Scheduled,
    Finalized,
}

impl From<AppointmentStatus> for i32 {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Scheduled => 0,
            AppointmentStatus::Finalized => 1,
        }
    }
}

impl TryFrom<i32> for AppointmentStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AppointmentStatus::Scheduled),
            1 => Ok(AppointmentStatus::Finalized),
            other => Err(format!("Unknown appointment status: {}", other)),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Finalized => write!(f, "finalized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.appointment_time.date()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.appointment_time.time()
    }
}

/// An appointment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: NaiveDateTime,
}

impl NewAppointment {
    pub fn date(&self) -> NaiveDate {
        self.appointment_time.date()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.appointment_time.time()
    }
}

/// Read model for appointment listings, joined with doctor and patient data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub patient_address: String,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

/// Start and end of the calendar day `date`, inclusive, in wall-clock time.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_as_integer() {
        assert_eq!(serde_json::to_value(AppointmentStatus::Finalized).unwrap(), json!(1));
        let status: AppointmentStatus = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(status, AppointmentStatus::Scheduled);
        assert!(serde_json::from_value::<AppointmentStatus>(json!(4)).is_err());
    }

    #[test]
    fn day_bounds_cover_full_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_string(), "2024-01-10 00:00:00");
        assert_eq!(end.to_string(), "2024-01-10 23:59:59");
    }
}
