use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod auth_routes;
pub mod doctor_routes;
pub mod patient_routes;

// Paths are mounted at the root: existing frontends call /pacientes, /agendarCita, ...
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::router())
        .merge(patient_routes::router())
        .merge(doctor_routes::router())
        .merge(appointment_routes::router())
        .with_state(state)
}
