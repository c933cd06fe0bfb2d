use crate::models::{GradingCriteria, GradingRequest};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Batch of copies for one exam.
///
/// The subject and model answer are identified by the caller; those
/// identifiers are forwarded to the model as the subject and answer text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CorrectionBatch {
    pub class_level: String,
    pub exam_subject_id: String,
    pub perfect_answer_id: String,
    #[validate(length(min = 1, message = "at least one student copy is required"))]
    pub student_copies: Vec<String>,
    #[serde(default)]
    pub grading_criteria: Option<GradingCriteria>,
}

impl CorrectionBatch {
    /// Grading request for the copy at `index`, if there is one.
    pub fn grading_request(&self, index: usize) -> Option<GradingRequest> {
        self.student_copies.get(index).map(|copy| GradingRequest {
            class_level: self.class_level.clone(),
            exam_subject_text: self.exam_subject_id.clone(),
            perfect_answer_text: self.perfect_answer_id.clone(),
            student_copy_text: copy.clone(),
            grading_criteria: self.grading_criteria.clone(),
        })
    }
}
