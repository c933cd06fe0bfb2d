use crate::models::{GradingRequest, GradingResult};
use crate::services::interpreter::interpret;
use crate::services::metrics::record_grading_outcome;
use crate::services::prompt::{build_grading_prompt, build_ocr_correction_prompt};
use crate::services::providers::{CompletionProvider, CompletionRequest};
use service_core::error::AppError;
use std::collections::HashMap;

/// Grade one copy. Provider failures are errors; unreadable answers are not.
pub async fn grade_copy(
    provider: &dyn CompletionProvider,
    request: &GradingRequest,
) -> Result<GradingResult, AppError> {
    let prompt = build_grading_prompt(request);

    tracing::info!(
        model = %provider.model(),
        class_level = %request.class_level,
        copy_len = request.student_copy_text.len(),
        "Grading student copy"
    );

    let completion: CompletionRequest = prompt.into();
    let raw = provider.complete(&completion).await.map_err(|e| {
        tracing::error!("Grading completion failed: {}", e);
        e
    })?;

    let result = interpret(&raw);
    record_grading_outcome(result.is_fallback());

    tracing::info!(
        grade = result.grade,
        comments = result.comments.len(),
        fallback = result.is_fallback(),
        "Grading completed"
    );

    Ok(result)
}

/// Ask the model to fix OCR mistakes. Returns the corrected text and the
/// share of original words it kept.
pub async fn correct_ocr_text(
    provider: &dyn CompletionProvider,
    text: &str,
    context: Option<&str>,
    language: Option<&str>,
) -> Result<(String, f64), AppError> {
    if text.trim().is_empty() {
        return Ok((text.to_string(), 1.0));
    }

    let request = build_ocr_correction_prompt(text, context, language);
    let corrected = provider.complete(&request).await.map_err(|e| {
        tracing::error!("OCR correction completion failed: {}", e);
        e
    })?;
    let corrected = corrected.trim().to_string();
    let confidence = preservation_ratio(text, &corrected);

    tracing::info!(
        original_len = text.len(),
        corrected_len = corrected.len(),
        confidence,
        "OCR text corrected"
    );

    Ok((corrected, confidence))
}

/// Fraction of the words of `original` (with multiplicity) found in `corrected`.
pub fn preservation_ratio(original: &str, corrected: &str) -> f64 {
    let mut available: HashMap<&str, usize> = HashMap::new();
    for word in corrected.split_whitespace() {
        *available.entry(word).or_default() += 1;
    }

    let mut total = 0usize;
    let mut kept = 0usize;
    for word in original.split_whitespace() {
        total += 1;
        if let Some(count) = available.get_mut(word).filter(|c| **c > 0) {
            *count -= 1;
            kept += 1;
        }
    }

    if total == 0 {
        1.0
    } else {
        kept as f64 / total as f64
    }
}
