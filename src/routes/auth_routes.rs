// src/routes/auth_routes.rs

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    auth::{verify_missing_user, verify_password},
    error::ApiError,
    extract::ApiJson,
    models::{AppState, LoginRequest, LoginResponse},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Credential check only: no session or token is issued.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Unknown user and wrong secret are indistinguishable to the caller,
    // in body and in timing
    let verified = match state.store.credential_hash(&req.usuario).await? {
        Some(stored_hash) => verify_password(&req.clave, &stored_hash),
        None => verify_missing_user(&req.clave),
    };

    if !verified {
        tracing::info!(usuario = %req.usuario, "login rejected");
        return Err(ApiError::invalid_credentials());
    }

    Ok(Json(LoginResponse {
        success: true,
        message: "Inicio de sesión exitoso.".into(),
    }))
}
