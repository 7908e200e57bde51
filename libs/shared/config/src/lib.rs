use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which backend the record and identity stores talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgrest,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub jwt_secret: String,
    pub store_backend: StoreBackend,
    pub store_timeout: Duration,
    pub api_port: u16,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// The token signing key is process-wide and must be present before any
    /// traffic is served, so a missing `JWT_SECRET` is a hard error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingVar("JWT_SECRET"))?;

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => match value.to_lowercase().as_str() {
                "postgrest" | "supabase" => StoreBackend::Postgrest,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "STORE_BACKEND",
                        value,
                    })
                }
            },
            Err(_) => StoreBackend::Postgrest,
        };

        let store_timeout = match env::var("STORE_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: "STORE_TIMEOUT_SECS",
                    value,
                })?,
            Err(_) => Duration::from_secs(5),
        };

        let api_port = match env::var("API_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "API_PORT",
                value,
            })?,
            Err(_) => 3000,
        };

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret,
            store_backend,
            store_timeout,
            api_port,
        };

        if config.store_backend == StoreBackend::Postgrest && !config.is_store_configured() {
            warn!("PostgREST store selected but SUPABASE_URL / SUPABASE_ANON_PUBLIC_KEY are missing");
        }

        Ok(config)
    }

    pub fn is_store_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}
