pub mod error;
pub mod memory;
pub mod postgrest;
pub mod state;
pub mod store;
pub mod supabase;

pub use error::StoreError;
pub use state::AppState;
pub use store::{AppointmentStore, IdentityStore};
