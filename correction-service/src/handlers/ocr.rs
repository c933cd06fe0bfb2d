use crate::dtos::{OcrCorrectionRequest, OcrCorrectionResponse};
use crate::services::correct_ocr_text;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

pub async fn correct_text(
    State(state): State<AppState>,
    Json(request): Json<OcrCorrectionRequest>,
) -> Result<Json<OcrCorrectionResponse>, AppError> {
    let (corrected_text, confidence) = correct_ocr_text(
        state.provider.as_ref(),
        &request.text,
        request.context.as_deref(),
        request.language.as_deref(),
    )
    .await?;

    Ok(Json(OcrCorrectionResponse {
        corrected_text,
        status: "success".to_string(),
        confidence,
    }))
}
