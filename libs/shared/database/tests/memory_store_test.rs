use assert_matches::assert_matches;
use chrono::NaiveDate;

use shared_database::memory::{MemoryAppointmentStore, MemoryIdentityStore};
use shared_database::{AppointmentStore, IdentityStore, StoreError};
use shared_models::appointment::{AppointmentStatus, NewAppointment};
use shared_models::principal::NewDoctor;

fn at(hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(hour, 0, 0).unwrap()
}

#[tokio::test]
async fn test_same_doctor_and_time_is_rejected() {
    let store = MemoryAppointmentStore::new();

    store.insert(NewAppointment { doctor_id: 1, patient_id: 2, appointment_time: at(9) }).await.unwrap();
    let second = store.insert(NewAppointment { doctor_id: 1, patient_id: 3, appointment_time: at(9) }).await;

    assert_matches!(second, Err(StoreError::Conflict(_)));
    assert_eq!(store.len().await, 1);

    // A different doctor at the same time is fine.
    store.insert(NewAppointment { doctor_id: 5, patient_id: 3, appointment_time: at(9) }).await.unwrap();
}

#[tokio::test]
async fn test_replace_allows_keeping_own_slot() {
    let store = MemoryAppointmentStore::new();
    let mut booked = store
        .insert(NewAppointment { doctor_id: 1, patient_id: 2, appointment_time: at(9) })
        .await
        .unwrap();

    booked.status = AppointmentStatus::Finalized;
    let replaced = store.replace(booked.clone()).await.unwrap();

    assert_eq!(replaced, Some(booked));
}

#[tokio::test]
async fn test_find_by_patient_orders_by_time() {
    let store = MemoryAppointmentStore::new();
    store.insert(NewAppointment { doctor_id: 1, patient_id: 2, appointment_time: at(15) }).await.unwrap();
    store.insert(NewAppointment { doctor_id: 4, patient_id: 2, appointment_time: at(8) }).await.unwrap();

    let rows = store.find_by_patient(2, Some(AppointmentStatus::Scheduled)).await.unwrap();
    let hours: Vec<_> = rows.iter().map(|a| a.appointment_time).collect();

    assert_eq!(hours, vec![at(8), at(15)]);
}

#[tokio::test]
async fn test_doctor_name_search_is_case_insensitive_and_ordered() {
    let store = MemoryIdentityStore::new();
    for email in ["a@clinic.test", "b@clinic.test"] {
        store.insert_doctor(NewDoctor {
            name: "Dr. Lee".to_string(),
            specialty: "Cardiology".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            phone: "5550000000".to_string(),
            available_times: vec![],
        }).await.unwrap();
    }

    let found = store.find_doctors_by_name("lee").await.unwrap();

    assert_eq!(found.len(), 2);
    assert!(found[0].id < found[1].id);
}
