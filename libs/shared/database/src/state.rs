use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};

use crate::error::StoreError;
use crate::memory::{MemoryAppointmentStore, MemoryIdentityStore};
use crate::postgrest::{PostgrestAppointmentStore, PostgrestIdentityStore};
use crate::store::{AppointmentStore, IdentityStore};
use crate::supabase::SupabaseClient;

/// Shared request state: configuration plus handles to the external stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identities: Arc<dyn IdentityStore>,
    pub appointments: Arc<dyn AppointmentStore>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let (identities, appointments): (Arc<dyn IdentityStore>, Arc<dyn AppointmentStore>) =
            match config.store_backend {
                StoreBackend::Postgrest => {
                    info!("Using PostgREST store at {}", config.supabase_url);
                    let supabase = Arc::new(SupabaseClient::new(&config)?);
                    (
                        Arc::new(PostgrestIdentityStore::new(Arc::clone(&supabase))),
                        Arc::new(PostgrestAppointmentStore::new(supabase)),
                    )
                }
                StoreBackend::Memory => {
                    info!("Using in-memory store");
                    (
                        Arc::new(MemoryIdentityStore::new()),
                        Arc::new(MemoryAppointmentStore::new()),
                    )
                }
            };

        Ok(Self::with_stores(config, identities, appointments))
    }

    pub fn with_stores(
        config: AppConfig,
        identities: Arc<dyn IdentityStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identities,
            appointments,
        }
    }
}
