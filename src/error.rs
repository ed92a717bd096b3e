use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{booking::BookingError, store::StoreError};

const INTERNAL_MESSAGE: &str = "Error interno del servidor.";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str, String),
    BadRequest(&'static str, String),
    /// Detail is logged, never sent to the client.
    Internal(String),
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("INVALID_CREDENTIALS", "Credenciales incorrectas.".into())
    }

    pub fn slot_taken() -> Self {
        ApiError::BadRequest(
            "SLOT_TAKEN",
            "La hora seleccionada ya está ocupada para este médico.".into(),
        )
    }

    pub fn patient_or_doctor_not_found() -> Self {
        ApiError::BadRequest("NOT_FOUND", "Paciente o médico no encontrado.".into())
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            success: false,
            code: code.to_string(),
            message: message.to_string(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(format!("db error: {e}"))
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::SlotTaken => ApiError::slot_taken(),
            BookingError::NotFound => ApiError::patient_or_doctor_not_found(),
            BookingError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(code, msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("INTERNAL", INTERNAL_MESSAGE),
                )
                    .into_response()
            }
        }
    }
}
