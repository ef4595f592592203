//! HTTP request handlers

use super::{AppState, SECRET_HEADER};
use crate::telegram::Update;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Telegram pushes updates here in webhook mode
        .route("/telegram/webhook", post(receive_update))
        .route("/health", get(health))
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<StatusCode, AppError> {
    if let Some(secret) = &state.webhook_secret {
        let presented = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_ref()) {
            tracing::warn!("Rejected webhook call with missing or wrong secret");
            return Err(AppError::Unauthorized);
        }
    }

    let update_id = update.update_id;
    let Some(inbound) = update.into_inbound() else {
        tracing::debug!(update_id, "Ignoring update");
        return Ok(StatusCode::OK);
    };

    state
        .inbound_tx
        .send(inbound)
        .await
        .map_err(|_| AppError::Unavailable("Runtime is shutting down".to_string()))?;

    Ok(StatusCode::OK)
}

// ============================================================
// Liveness
// ============================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_version() -> &'static str {
    concat!("survey-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

enum AppError {
    Unauthorized,
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid secret token".to_string()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
