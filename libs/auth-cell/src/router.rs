use axum::{
    Router,
    routing::{get, post},
};

use shared_database::AppState;

use crate::handlers;

/// Login and token validation. Every route here authenticates on its own,
/// so none of them sit behind the token middleware.
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/{role}/login", post(handlers::login))
        .route("/validate/{role}", get(handlers::validate_token))
        .with_state(state)
}
