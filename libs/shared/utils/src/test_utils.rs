use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration as StdDuration;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use shared_config::{AppConfig, StoreBackend};
use shared_database::memory::{MemoryAppointmentStore, MemoryIdentityStore};
use shared_database::{AppState, IdentityStore};
use shared_models::principal::{Admin, Doctor, NewDoctor, NewPatient, Patient};

use crate::jwt::issue_token;
use crate::password::hash_password;

/// Password every seeded principal shares.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Argon2 is slow in debug builds, so the shared hash is computed once.
pub fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("argon2 hashing failed"))
}

static PHONE_SEQ: AtomicU64 = AtomicU64::new(1);

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            store_backend: StoreBackend::Memory,
            store_timeout: StdDuration::from_secs(5),
            api_port: 0,
        }
    }
}

/// In-memory clinic with typed handles to its stores, for seeding and
/// inspecting state around the code under test.
pub struct TestClinic {
    pub identities: Arc<MemoryIdentityStore>,
    pub appointments: Arc<MemoryAppointmentStore>,
    pub state: AppState,
}

impl Default for TestClinic {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClinic {
    pub fn new() -> Self {
        let identities = Arc::new(MemoryIdentityStore::new());
        let appointments = Arc::new(MemoryAppointmentStore::new());
        let state = AppState::with_stores(
            TestConfig::default().to_app_config(),
            identities.clone(),
            appointments.clone(),
        );

        Self { identities, appointments, state }
    }

    pub fn secret(&self) -> &str {
        &self.state.config.jwt_secret
    }

    pub async fn add_admin(&self, username: &str) -> Admin {
        self.identities
            .insert_admin(username, test_password_hash())
            .await
            .expect("seeding admin failed")
    }

    pub async fn add_doctor(&self, name: &str, email: &str, slots: &[&str]) -> Doctor {
        self.identities
            .insert_doctor(NewDoctor {
                name: name.to_string(),
                specialty: "General Practice".to_string(),
                email: email.to_string(),
                password: test_password_hash().to_string(),
                phone: "5550000000".to_string(),
                available_times: slots.iter().map(|s| s.to_string()).collect(),
            })
            .await
            .expect("seeding doctor failed")
    }

    pub async fn add_patient(&self, name: &str, email: &str) -> Patient {
        let phone = format!("555{:07}", PHONE_SEQ.fetch_add(1, Ordering::Relaxed));
        self.identities
            .insert_patient(NewPatient {
                name: name.to_string(),
                email: email.to_string(),
                password: test_password_hash().to_string(),
                phone,
                address: "1 Clinic Road".to_string(),
            })
            .await
            .expect("seeding patient failed")
    }

    /// A valid token whose subject is `identifier`.
    pub fn token_for(&self, identifier: &str) -> String {
        issue_token(identifier, self.secret(), Utc::now()).expect("token issuing failed")
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Builds a token by hand, independent of the production encoder.
    pub fn create_test_token(subject: &str, secret: &str, issued_at: DateTime<Utc>, ttl: Duration) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": subject,
            "iat": issued_at.timestamp(),
            "exp": (issued_at + ttl).timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(subject: &str, secret: &str) -> String {
        Self::create_test_token(subject, secret, Utc::now() - Duration::days(8), Duration::days(7))
    }

    pub fn create_invalid_signature_token(subject: &str) -> String {
        Self::create_test_token(subject, "wrong-secret", Utc::now(), Duration::days(7))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}
