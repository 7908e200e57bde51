use assert_matches::assert_matches;

use patient_cell::{CreatePatientRequest, PatientError, PatientService};
use shared_utils::password::verify_password;
use shared_utils::test_utils::TestClinic;

fn signup(email: &str, phone: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        name: "Pat Doe".to_string(),
        email: email.to_string(),
        password: "patient-pass".to_string(),
        phone: phone.to_string(),
        address: "2 Main St".to_string(),
    }
}

#[tokio::test]
async fn register_stores_a_hashed_credential() {
    let clinic = TestClinic::new();
    let service = PatientService::new(&clinic.state);

    let patient = service.register(signup("pat@clinic.test", "5550101")).await.unwrap();

    assert!(verify_password("patient-pass", &patient.password).unwrap());
    assert_eq!(service.get_patient(patient.id).await.unwrap().email, "pat@clinic.test");
}

#[tokio::test]
async fn duplicate_email_or_phone_conflicts() {
    let clinic = TestClinic::new();
    let service = PatientService::new(&clinic.state);
    service.register(signup("pat@clinic.test", "5550101")).await.unwrap();

    assert_matches!(
        service.register(signup("pat@clinic.test", "5550202")).await,
        Err(PatientError::AlreadyExists)
    );
    assert_matches!(
        service.register(signup("other@clinic.test", "5550101")).await,
        Err(PatientError::AlreadyExists)
    );
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let clinic = TestClinic::new();
    let service = PatientService::new(&clinic.state);

    let mut request = signup("pat@clinic.test", "5550101");
    request.password.clear();

    assert_matches!(service.register(request).await, Err(PatientError::ValidationError(_)));
    assert_matches!(service.get_patient(77).await, Err(PatientError::NotFound));
}
