use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_utils::test_utils::{JwtTestUtils, TestClinic, TEST_PASSWORD};

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn doctor_login_then_validate() {
    let clinic = TestClinic::new();
    clinic.add_doctor("Dr. Lee", "lee@clinic.test", &[]).await;
    let app = auth_routes(clinic.state.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/doctor/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "identifier": "lee@clinic.test", "password": TEST_PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login = body_json(response).await;
    assert_eq!(login["role"], "doctor");
    let token = login["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/validate/doctor")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], true);

    let request = Request::builder()
        .uri("/validate/patient")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn bad_password_is_unauthorized() {
    let clinic = TestClinic::new();
    clinic.add_admin("root").await;
    let app = auth_routes(clinic.state.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "identifier": "root", "password": "guess" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid credentials");
}

#[tokio::test]
async fn unknown_role_is_bad_request() {
    let clinic = TestClinic::new();
    let app = auth_routes(clinic.state.clone());

    let request = Request::builder()
        .uri("/validate/nurse")
        .header("authorization", "Bearer whatever")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_token_and_missing_header_are_unauthorized() {
    let clinic = TestClinic::new();
    clinic.add_patient("Pat", "pat@clinic.test").await;
    let app = auth_routes(clinic.state.clone());
    let expired = JwtTestUtils::create_expired_token("pat@clinic.test", clinic.secret());

    let request = Request::builder()
        .uri("/validate/patient")
        .header("authorization", format!("Bearer {}", expired))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/validate/patient")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::UNAUTHORIZED);
}
