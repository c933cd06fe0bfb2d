use crate::dtos::CorrectionBatch;
use crate::models::{GradingRequest, GradingResult};
use crate::services::grade_copy;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

/// Grade the first copy of a batch.
pub async fn correct_batch(
    State(state): State<AppState>,
    Json(batch): Json<CorrectionBatch>,
) -> Result<Json<GradingResult>, AppError> {
    batch.validate()?;

    if batch.student_copies.len() > 1 {
        tracing::warn!(
            copies = batch.student_copies.len(),
            "Batch contains several copies; only the first one is graded"
        );
    }

    let request = batch
        .grading_request(0)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No student copy submitted")))?;

    let result = grade_copy(state.provider.as_ref(), &request).await?;
    Ok(Json(result))
}

/// Grade a single copy given its full texts.
pub async fn grade(
    State(state): State<AppState>,
    Json(request): Json<GradingRequest>,
) -> Result<Json<GradingResult>, AppError> {
    let result = grade_copy(state.provider.as_ref(), &request).await?;
    Ok(Json(result))
}
