use serde::{Deserialize, Serialize};

use crate::auth::Role;

// Credentials are stored as Argon2 hashes and are never serialized back out.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    /// Published slot labels in the order the doctor published them.
    #[serde(default)]
    pub available_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    pub address: String,
}

/// Any authenticated actor.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(Admin),
    Doctor(Doctor),
    Patient(Patient),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Principal::Admin(a) => a.id,
            Principal::Doctor(d) => d.id,
            Principal::Patient(p) => p.id,
        }
    }

    /// The identifier used as token subject.
    pub fn identifier(&self) -> &str {
        match self {
            Principal::Admin(a) => &a.username,
            Principal::Doctor(d) => &d.email,
            Principal::Patient(p) => &p.email,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(_) => Role::Admin,
            Principal::Doctor(_) => Role::Doctor,
            Principal::Patient(_) => Role::Patient,
        }
    }

    pub fn credential(&self) -> &str {
        match self {
            Principal::Admin(a) => &a.password,
            Principal::Doctor(d) => &d.password,
            Principal::Patient(p) => &p.password,
        }
    }
}

/// Fields needed to register a doctor. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub available_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_not_serialized() {
        let doctor = Doctor {
            id: 1,
            name: "Dr. Lee".to_string(),
            specialty: "Cardiology".to_string(),
            email: "lee@clinic.test".to_string(),
            password: "$argon2id$hash".to_string(),
            phone: "5550000000".to_string(),
            available_times: vec!["09:00 AM".to_string()],
        };

        let value = serde_json::to_value(&doctor).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "lee@clinic.test");
    }

    #[test]
    fn principal_identifier_depends_on_role() {
        let admin = Principal::Admin(Admin {
            id: 7,
            username: "root".to_string(),
            password: String::new(),
        });
        assert_eq!(admin.identifier(), "root");
        assert_eq!(admin.role(), Role::Admin);
        assert_eq!(admin.id(), 7);
    }
}
