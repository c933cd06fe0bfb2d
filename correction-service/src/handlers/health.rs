use crate::startup::AppState;
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use service_core::utils::secret::secret_matches;

/// Header carrying the shared health check secret.
pub const HEALTH_CHECK_TOKEN_HEADER: &str = "health-check-token";

pub async fn health_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let provided = headers
        .get(HEALTH_CHECK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if !secret_matches(&state.config.security.health_check_token, provided) {
        tracing::warn!(
            token_present = provided.is_some(),
            "Health check rejected"
        );
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Invalid health check token"
        )));
    }

    Ok(Json(json!({ "status": "healthy" })))
}
