// src/routes/patient_routes.rs

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::{
    error::ApiError,
    extract::ApiJson,
    models::{AppState, NewPatient, PatientRow},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/pacientes", post(create_patient).get(list_patients))
}

pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewPatient>,
) -> Result<(StatusCode, Json<PatientRow>), ApiError> {
    let row = state.store.insert_patient(&req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientRow>>, ApiError> {
    let rows = state.store.list_patients().await?;
    Ok(Json(rows))
}
