use crate::services::interpreter::ERROR_KEY;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Grading scale used when the model output does not say otherwise.
pub const DEFAULT_MAX_GRADE: f64 = 20.0;

/// Caller-supplied rubric: criterion name to description or weight.
///
/// Ordered so that prompts render identically for identical input.
pub type GradingCriteria = BTreeMap<String, Value>;

/// Everything needed to grade a single student copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRequest {
    /// Class level, e.g. "Terminale S".
    pub class_level: String,
    pub exam_subject_text: String,
    pub perfect_answer_text: String,
    pub student_copy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_criteria: Option<GradingCriteria>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub grade: f64,
    #[serde(default = "default_max_grade")]
    pub max_grade: f64,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub detailed_feedback: HashMap<String, Value>,
}

fn default_max_grade() -> f64 {
    DEFAULT_MAX_GRADE
}

impl GradingResult {
    /// True when this result is the degraded fallback rather than a parsed grade.
    pub fn is_fallback(&self) -> bool {
        self.detailed_feedback.contains_key(ERROR_KEY)
    }
}
