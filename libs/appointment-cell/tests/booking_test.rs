use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};

use appointment_cell::{AppointmentBookingService, AppointmentError, BookingValidation};
use doctor_cell::AvailabilityService;
use shared_database::AppointmentStore;
use shared_models::appointment::{AppointmentStatus, NewAppointment};
use shared_utils::test_utils::TestClinic;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    day().and_hms_opt(h, m, 0).unwrap()
}

fn request(doctor_id: i64, patient_id: i64, time: NaiveDateTime) -> NewAppointment {
    NewAppointment { doctor_id, patient_id, appointment_time: time }
}

#[tokio::test]
async fn dr_lee_scenario() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM"]).await;
    let first = clinic.add_patient("First", "first@clinic.test").await;
    let second = clinic.add_patient("Second", "second@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);

    let booked = service.book_validated(request(lee.id, first.id, at(9, 0))).await.unwrap();
    assert_eq!(booked.status, AppointmentStatus::Scheduled);

    let free = AvailabilityService::new(&clinic.state).availability(lee.id, day()).await.unwrap();
    assert_eq!(free, vec!["10:00 AM"]);

    assert_eq!(
        service.validate_booking(&request(lee.id, second.id, at(9, 0))).await.unwrap(),
        BookingValidation::SlotUnavailable
    );
    assert_eq!(
        service.validate_booking(&request(lee.id, second.id, at(10, 0))).await.unwrap(),
        BookingValidation::Valid
    );
}

#[tokio::test]
async fn validation_rejects_unknown_doctor_and_unpublished_times() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "on call"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);

    assert_eq!(
        service.validate_booking(&request(999, pat.id, at(9, 0))).await.unwrap(),
        BookingValidation::DoctorNotFound
    );
    assert_eq!(
        service.validate_booking(&request(lee.id, pat.id, at(9, 30))).await.unwrap(),
        BookingValidation::SlotUnavailable
    );
    assert_matches!(
        service.book_validated(request(lee.id, pat.id, at(21, 0))).await,
        Err(AppointmentError::SlotUnavailable)
    );
}

#[tokio::test]
async fn store_uniqueness_closes_the_validate_commit_race() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM"]).await;
    let a = clinic.add_patient("A", "a@clinic.test").await;
    let b = clinic.add_patient("B", "b@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);

    // Both callers validated before either committed.
    assert_eq!(
        service.validate_booking(&request(lee.id, a.id, at(9, 0))).await.unwrap(),
        BookingValidation::Valid
    );
    assert_eq!(
        service.validate_booking(&request(lee.id, b.id, at(9, 0))).await.unwrap(),
        BookingValidation::Valid
    );

    service.book(request(lee.id, a.id, at(9, 0))).await.unwrap();
    assert_matches!(
        service.book(request(lee.id, b.id, at(9, 0))).await,
        Err(AppointmentError::SlotUnavailable)
    );
    assert_eq!(clinic.appointments.len().await, 1);
}

#[tokio::test]
async fn update_moves_the_appointment_and_may_keep_its_own_slot() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book_validated(request(lee.id, pat.id, at(9, 0))).await.unwrap();

    let same = service.update(booked.id, request(lee.id, pat.id, at(9, 0)), pat.id).await.unwrap();
    assert_eq!(same.appointment_time, at(9, 0));

    let moved = service.update(booked.id, request(lee.id, pat.id, at(10, 0)), pat.id).await.unwrap();
    assert_eq!(moved.appointment_time, at(10, 0));
    assert_eq!(
        AvailabilityService::new(&clinic.state).availability(lee.id, day()).await.unwrap(),
        vec!["09:00 AM"]
    );
}

#[tokio::test]
async fn update_is_limited_to_the_owner() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM"]).await;
    let owner = clinic.add_patient("Owner", "owner@clinic.test").await;
    let other = clinic.add_patient("Other", "other@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book_validated(request(lee.id, owner.id, at(9, 0))).await.unwrap();

    assert_matches!(
        service.update(booked.id, request(lee.id, other.id, at(10, 0)), other.id).await,
        Err(AppointmentError::Forbidden(_))
    );
    assert_matches!(
        service.update(booked.id, request(lee.id, other.id, at(10, 0)), owner.id).await,
        Err(AppointmentError::Forbidden(_))
    );
    assert_matches!(
        service.update(999, request(lee.id, owner.id, at(10, 0)), owner.id).await,
        Err(AppointmentError::NotFound)
    );
    assert_eq!(clinic.appointments.get(booked.id).await.unwrap().unwrap(), booked);
}

#[tokio::test]
async fn update_revalidates_the_new_time() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM", "10:00 AM"]).await;
    let a = clinic.add_patient("A", "a@clinic.test").await;
    let b = clinic.add_patient("B", "b@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let mine = service.book_validated(request(lee.id, a.id, at(9, 0))).await.unwrap();
    service.book_validated(request(lee.id, b.id, at(10, 0))).await.unwrap();

    assert_matches!(
        service.update(mine.id, request(lee.id, a.id, at(10, 0)), a.id).await,
        Err(AppointmentError::SlotUnavailable)
    );
    assert_matches!(
        service.update(mine.id, request(42, a.id, at(10, 0)), a.id).await,
        Err(AppointmentError::DoctorNotFound)
    );
}

#[tokio::test]
async fn forbidden_cancel_leaves_the_record() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM"]).await;
    let owner = clinic.add_patient("Owner", "owner@clinic.test").await;
    let other = clinic.add_patient("Other", "other@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book_validated(request(lee.id, owner.id, at(9, 0))).await.unwrap();

    assert_matches!(
        service.cancel(booked.id, other.id).await,
        Err(AppointmentError::Forbidden(msg)) if msg == "You are not authorized to cancel this appointment"
    );
    assert!(clinic.appointments.get(booked.id).await.unwrap().is_some());
}

#[tokio::test]
async fn cancel_then_cancel_again_is_not_found() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book_validated(request(lee.id, pat.id, at(9, 0))).await.unwrap();

    service.cancel(booked.id, pat.id).await.unwrap();
    assert_matches!(service.cancel(booked.id, pat.id).await, Err(AppointmentError::NotFound));
    assert!(clinic.appointments.is_empty().await);
}

#[tokio::test]
async fn change_status_overwrites_or_reports_missing() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book(request(lee.id, pat.id, at(9, 0))).await.unwrap();

    service.change_status(booked.id, AppointmentStatus::Finalized).await.unwrap();
    assert_eq!(
        clinic.appointments.get(booked.id).await.unwrap().unwrap().status,
        AppointmentStatus::Finalized
    );
    assert_matches!(
        service.change_status(999, AppointmentStatus::Finalized).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn finalize_checks_doctor_and_status() {
    let clinic = TestClinic::new();
    let lee = clinic.add_doctor("Dr. Lee", "lee@clinic.test", &["09:00 AM"]).await;
    let kim = clinic.add_doctor("Dr. Kim", "kim@clinic.test", &["09:00 AM"]).await;
    let pat = clinic.add_patient("Pat", "pat@clinic.test").await;
    let service = AppointmentBookingService::new(&clinic.state);
    let booked = service.book(request(lee.id, pat.id, at(9, 0))).await.unwrap();

    assert_matches!(service.finalize(booked.id, kim.id).await, Err(AppointmentError::Forbidden(_)));

    let finalized = service.finalize(booked.id, lee.id).await.unwrap();
    assert_eq!(finalized.status, AppointmentStatus::Finalized);

    assert_matches!(
        service.finalize(booked.id, lee.id).await,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Finalized))
    );
    assert_matches!(
        service.cancel(booked.id, pat.id).await,
        Err(AppointmentError::InvalidStatusTransition(_))
    );
}
