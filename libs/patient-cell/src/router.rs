use axum::{middleware, routing::{get, post}, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_patient_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", post(register_patient));

    let protected_routes = Router::new()
        .route("/me", get(get_own_details))
        .route("/appointments/filter", get(filter_own_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
