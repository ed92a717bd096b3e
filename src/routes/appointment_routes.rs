// src/routes/appointment_routes.rs

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    booking::{self, BookingError},
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    models::{
        AppState, AppointmentListRow, BookAppointmentRequest, BookAppointmentResponse, Slot,
        SlotStatus,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/agendarCita", post(book_appointment))
        .route("/citas", get(list_appointments))
        .route("/verificar-cita", get(verify_slot))
}

/* ============================================================
   POST /agendarCita
   ============================================================ */

pub async fn book_appointment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<BookAppointmentResponse>), ApiError> {
    let appointment = match booking::book_appointment(state.store.as_ref(), req).await {
        Ok(a) => a,
        Err(e @ (BookingError::SlotTaken | BookingError::NotFound)) => {
            tracing::info!(reason = %e, "booking rejected");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        appointment_id = appointment.id,
        medico_id = appointment.medico_id,
        "appointment booked"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookAppointmentResponse {
            success: true,
            message: "Cita agendada correctamente".into(),
            appointment,
        }),
    ))
}

/* ============================================================
   GET /citas
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentListRow>>, ApiError> {
    let rows = state.store.list_appointments().await?;
    Ok(Json(rows))
}

/* ============================================================
   GET /verificar-cita?medico_id&fecha&hora
   ============================================================ */

pub async fn verify_slot(
    State(state): State<AppState>,
    ApiQuery(slot): ApiQuery<Slot>,
) -> Result<Json<SlotStatus>, ApiError> {
    let ocupada = booking::is_slot_taken(state.store.as_ref(), &slot).await?;
    Ok(Json(SlotStatus { ocupada }))
}
