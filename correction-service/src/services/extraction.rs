use crate::models::ExtractedDocument;
use crate::services::prompt::build_extraction_prompt;
use crate::services::providers::{CompletionProvider, DocumentAttachment};
use service_core::error::AppError;
use std::path::Path;
use tempfile::NamedTempFile;

/// A file received over multipart, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub document_type: Option<String>,
    pub data: Vec<u8>,
}

pub fn is_pdf_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Stage the upload in a temporary file, hand it to the provider and build
/// the extraction result.
///
/// The temporary file is removed once the provider call returns, whatever
/// the outcome. If the future is dropped early, `NamedTempFile`'s destructor
/// removes it.
pub async fn extract_document(
    provider: &dyn CompletionProvider,
    upload: UploadedFile,
) -> Result<ExtractedDocument, AppError> {
    if !is_pdf_filename(&upload.filename) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Only PDF files are accepted, got '{}'",
            upload.filename
        )));
    }

    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| {
            tracing::error!("Failed to create temporary upload file: {}", e);
            AppError::from(e)
        })?;

    tokio::fs::write(staged.path(), &upload.data)
        .await
        .map_err(|e| {
            tracing::error!(
                path = %staged.path().display(),
                "Failed to write temporary upload file: {}",
                e
            );
            AppError::from(e)
        })?;

    tracing::info!(
        filename = %upload.filename,
        size = upload.data.len(),
        document_type = ?upload.document_type,
        "Document extraction started"
    );

    let request = build_extraction_prompt(&upload.filename).with_attachment(DocumentAttachment {
        path: staged.path().to_path_buf(),
        filename: upload.filename.clone(),
        mime_type: upload.content_type.clone(),
    });

    let outcome = provider.complete(&request).await;
    release(staged);

    let text = outcome.map_err(|e| {
        tracing::error!(filename = %upload.filename, "Document extraction failed: {}", e);
        e
    })?;

    let document = ExtractedDocument::new(
        text,
        &upload.filename,
        upload.data.len(),
        &upload.content_type,
        upload.document_type.as_deref(),
    );

    tracing::info!(
        file_id = %document.file_id,
        text_len = document.text_content.len(),
        "Document extraction completed"
    );

    Ok(document)
}

fn release(staged: NamedTempFile) {
    let path = staged.path().to_path_buf();
    if let Err(e) = staged.close() {
        tracing::warn!(path = %path.display(), "Failed to remove temporary upload file: {}", e);
    }
}
