//! Fixed-format instructions sent to the completion provider.

use crate::models::{GradingCriteria, GradingRequest};
use crate::services::providers::CompletionRequest;
use serde_json::Value;

pub const GRADING_SYSTEM_PROMPT: &str = "Tu es un professeur expert en correction de copies. \
Analyse la copie de l'étudiant en la comparant au sujet et à la correction type. \
Attribue une note sur 20 et fournis des commentaires détaillés. \
Réponds exactement sous la forme :\n\
Note: <note>/20\n\
Commentaires:\n\
- <commentaire>";

pub const STANDARD_CRITERIA: &str = "Notation standard sur 20 points";

pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "Tu es un expert en OCR. Extrais le texte de ce document PDF.";

pub const OCR_CORRECTION_SYSTEM_PROMPT: &str = "Tu corriges les erreurs de reconnaissance \
de caractères (OCR) dans un texte. Conserve le sens, la structure et la langue du texte. \
Réponds uniquement avec le texte corrigé, sans commentaire.";

/// System and user messages for one grading call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingPrompt {
    pub system: String,
    pub user: String,
}

impl From<GradingPrompt> for CompletionRequest {
    fn from(prompt: GradingPrompt) -> Self {
        CompletionRequest::new(prompt.system, prompt.user)
    }
}

/// Render the grading prompt. Empty fields are passed through as-is.
pub fn build_grading_prompt(request: &GradingRequest) -> GradingPrompt {
    let user = format!(
        "Niveau: {}\n\n\
         Sujet:\n{}\n\n\
         Correction type:\n{}\n\n\
         Copie de l'étudiant:\n{}\n\n\
         Critères de notation:\n{}\n",
        request.class_level,
        request.exam_subject_text,
        request.perfect_answer_text,
        request.student_copy_text,
        render_criteria(request.grading_criteria.as_ref()),
    );

    GradingPrompt {
        system: GRADING_SYSTEM_PROMPT.to_string(),
        user,
    }
}

fn render_criteria(criteria: Option<&GradingCriteria>) -> String {
    match criteria {
        Some(criteria) if !criteria.is_empty() => criteria
            .iter()
            .map(|(name, detail)| match detail {
                Value::String(text) => format!("- {}: {}", name, text),
                other => format!("- {}: {}", name, other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => STANDARD_CRITERIA.to_string(),
    }
}

pub fn build_extraction_prompt(filename: &str) -> CompletionRequest {
    CompletionRequest::new(
        EXTRACTION_SYSTEM_PROMPT,
        format!(
            "Voici le contenu du fichier {}. Extrais tout le texte.",
            filename
        ),
    )
}

pub fn build_ocr_correction_prompt(
    text: &str,
    context: Option<&str>,
    language: Option<&str>,
) -> CompletionRequest {
    let mut user = String::new();
    if let Some(language) = language.filter(|l| !l.trim().is_empty()) {
        user.push_str(&format!("Langue: {}\n\n", language));
    }
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        user.push_str(&format!("Contexte:\n{}\n\n", context));
    }
    user.push_str(&format!("Texte à corriger:\n{}", text));

    CompletionRequest::new(OCR_CORRECTION_SYSTEM_PROMPT, user)
}
