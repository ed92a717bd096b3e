// src/routes/doctor_routes.rs

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    booking,
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    models::{AppState, DoctorCreated, DoctorFilter, DoctorRow, NewDoctor, SpecialityRow},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/medicos", post(create_doctor).get(list_doctors))
        .route("/especialidades", get(list_specialities))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewDoctor>,
) -> Result<(StatusCode, Json<DoctorCreated>), ApiError> {
    let created = booking::register_doctor(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_doctors(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<DoctorFilter>,
) -> Result<Json<Vec<DoctorRow>>, ApiError> {
    // ?especialidad= (empty) behaves like no filter
    let filter = q.especialidad.as_deref().filter(|s| !s.is_empty());
    let rows = state.store.list_doctors(filter).await?;
    Ok(Json(rows))
}

pub async fn list_specialities(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpecialityRow>>, ApiError> {
    let rows = state.store.list_specialities().await?;
    Ok(Json(rows))
}
