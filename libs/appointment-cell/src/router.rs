// libs/appointment-cell/src/router.rs
use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    // All appointment operations require authentication; roles are checked
    // per handler
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", put(handlers::update_appointment).delete(handlers::cancel_appointment))
        .route("/{appointment_id}/finalize", post(handlers::finalize_appointment))
        .route("/doctor", get(handlers::get_own_schedule))
        .route("/by-doctor-name", get(handlers::get_schedule_by_doctor_name))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
