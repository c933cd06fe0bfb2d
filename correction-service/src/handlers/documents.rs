use crate::models::ExtractedDocument;
use crate::services::{extract_document, is_pdf_filename, UploadedFile};
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use service_core::error::AppError;

const FILE_FIELD: &str = "file";
const DOCUMENT_TYPE_FIELD: &str = "document_type";

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractedDocument>, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or("unnamed").to_string();
                // Reject before buffering the body.
                if !is_pdf_filename(&filename) {
                    tracing::warn!(filename = %filename, "Rejected non-PDF upload");
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "Only PDF files are accepted, got '{}'",
                        filename
                    )));
                }
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                })?;
                file = Some((filename, content_type, data.to_vec()));
            }
            Some(DOCUMENT_TYPE_FIELD) => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read document_type: {}", e))
                })?;
                document_type = Some(value);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;
    let document_type = document_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Missing document_type field")))?;

    let document = extract_document(
        state.provider.as_ref(),
        UploadedFile {
            filename,
            content_type,
            document_type: Some(document_type),
            data,
        },
    )
    .await?;

    Ok(Json(document))
}
