use chrono::{NaiveDate, NaiveDateTime};

use doctor_cell::AvailabilityService;
use shared_database::AppointmentStore;
use shared_models::appointment::NewAppointment;
use shared_utils::test_utils::TestClinic;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

async fn book(clinic: &TestClinic, doctor_id: i64, patient_id: i64, time: NaiveDateTime) -> i64 {
    clinic
        .appointments
        .insert(NewAppointment { doctor_id, patient_id, appointment_time: time })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn booked_slot_is_removed_and_order_is_kept() {
    let clinic = TestClinic::new();
    let lee = clinic
        .add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM", "11:00 AM"])
        .await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    book(&clinic, lee.id, pat.id, at(day(), 9, 0)).await;

    let free = AvailabilityService::new(&clinic.state)
        .availability(lee.id, day())
        .await
        .unwrap();

    assert_eq!(free, vec!["10:00 AM".to_string(), "11:00 AM".to_string()]);
}

#[tokio::test]
async fn bookings_on_other_days_or_doctors_do_not_count() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00", "10:00"]).await;
    let kim = clinic.add_doctor("Dr. Kim", "kim@clinic.test", &["09:00", "10:00"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;

    book(&clinic, lee.id, pat.id, at(day().succ_opt().unwrap(), 9, 0)).await;
    book(&clinic, kim.id, pat.id, at(day(), 10, 0)).await;

    let free = AvailabilityService::new(&clinic.state)
        .availability(lee.id, day())
        .await
        .unwrap();

    assert_eq!(free, vec!["09:00".to_string(), "10:00".to_string()]);
}

#[tokio::test]
async fn result_is_published_minus_occupied() {
    let clinic = TestClinic::new();
    let published = ["08:00", "08:30", "09:00-10:00", "by appointment", "14:00"];
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &published).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    book(&clinic, lee.id, pat.id, at(day(), 8, 30)).await;
    book(&clinic, lee.id, pat.id, at(day(), 9, 15)).await;

    let free = AvailabilityService::new(&clinic.state)
        .availability(lee.id, day())
        .await
        .unwrap();

    assert_eq!(free, vec!["08:00", "by appointment", "14:00"]);
    assert!(free.iter().all(|label| published.contains(&label.as_str())));
}

#[tokio::test]
async fn unknown_doctor_has_no_availability() {
    let clinic = TestClinic::new();

    let free = AvailabilityService::new(&clinic.state)
        .availability(999, day())
        .await
        .unwrap();

    assert!(free.is_empty());
}

#[tokio::test]
async fn excluding_an_appointment_frees_its_own_slot() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let id = book(&clinic, lee.id, pat.id, at(day(), 9, 0)).await;
    let service = AvailabilityService::new(&clinic.state);

    assert_eq!(service.availability(lee.id, day()).await.unwrap(), vec!["10:00 AM"]);
    assert_eq!(
        service.availability_excluding(lee.id, day(), id).await.unwrap(),
        vec!["09:00 AM", "10:00 AM"]
    );
}
