//! Turns the model's free-text grading answer into a [`GradingResult`].
//!
//! The model is asked to answer as
//!
//! ```text
//! Note: 15/20
//! Commentaires:
//! - Bon travail
//! - Manque de détails
//! ```
//!
//! but nothing enforces it. [`parse_grading_response`] is strict about the
//! first line and reports why it gave up; [`interpret`] never fails and
//! substitutes [`fallback_result`] so a human grader still gets something.

use crate::models::{GradingResult, DEFAULT_MAX_GRADE};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// `detailed_feedback` key holding the raw model text on success.
pub const ANALYSIS_KEY: &str = "analysis";
/// `detailed_feedback` key present only on the fallback result.
pub const ERROR_KEY: &str = "error";
/// `detailed_feedback` key holding the raw model text on the fallback result.
pub const RAW_ANALYSIS_KEY: &str = "raw_analysis";

/// Grade given when the answer could not be read.
pub const FALLBACK_GRADE: f64 = 10.0;
pub const MANUAL_REVIEW_COMMENT: &str =
    "Erreur dans l'analyse automatique. Merci de vérifier manuellement.";

/// Lines before the first comment: the grade line and a section header.
const HEADER_LINES: usize = 2;

const BULLET: &str = "- ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("response is empty")]
    Empty,

    #[error("grade line has no ':' separator: {0:?}")]
    MissingLabel(String),

    #[error("grade line has no '/' separator: {0:?}")]
    MissingScale(String),

    #[error("grade is not a finite number: {0:?}")]
    InvalidGrade(String),
}

/// Parse a model answer, reporting the first thing that does not fit.
pub fn parse_grading_response(raw: &str) -> Result<GradingResult, InterpretError> {
    let grade_line = raw.lines().next().ok_or(InterpretError::Empty)?;
    let grade = parse_grade_line(grade_line)?;

    let comments = raw
        .lines()
        .skip(HEADER_LINES)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.strip_prefix(BULLET).unwrap_or(line).trim().to_string())
        .collect();

    let mut detailed_feedback = HashMap::new();
    detailed_feedback.insert(ANALYSIS_KEY.to_string(), json!(raw));

    Ok(GradingResult {
        grade,
        max_grade: DEFAULT_MAX_GRADE,
        comments,
        detailed_feedback,
    })
}

/// `<label>: <grade>/<max>`; the stated max is not used.
fn parse_grade_line(line: &str) -> Result<f64, InterpretError> {
    let value = line
        .split(':')
        .nth(1)
        .ok_or_else(|| InterpretError::MissingLabel(line.to_string()))?;

    let (grade, _max) = value
        .trim()
        .split_once('/')
        .ok_or_else(|| InterpretError::MissingScale(line.to_string()))?;

    let grade = grade.trim();
    grade
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
        .ok_or_else(|| InterpretError::InvalidGrade(grade.to_string()))
}

/// Safe default returned when the answer cannot be read.
pub fn fallback_result(raw: &str, reason: &InterpretError) -> GradingResult {
    let mut detailed_feedback = HashMap::new();
    detailed_feedback.insert(ERROR_KEY.to_string(), json!(reason.to_string()));
    detailed_feedback.insert(RAW_ANALYSIS_KEY.to_string(), json!(raw));

    GradingResult {
        grade: FALLBACK_GRADE,
        max_grade: DEFAULT_MAX_GRADE,
        comments: vec![MANUAL_REVIEW_COMMENT.to_string()],
        detailed_feedback,
    }
}

/// Best-effort interpretation; never fails.
pub fn interpret(raw: &str) -> GradingResult {
    match parse_grading_response(raw) {
        Ok(result) => result,
        Err(reason) => {
            tracing::warn!(error = %reason, "Grading response did not match the expected format");
            fallback_result(raw, &reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_response() {
        let raw = "Note: 15/20\nCommentaires:\n- Bon travail\n- Manque de détails";
        let result = interpret(raw);

        assert_eq!(result.grade, 15.0);
        assert_eq!(result.max_grade, 20.0);
        assert_eq!(result.comments, vec!["Bon travail", "Manque de détails"]);
        assert_eq!(result.detailed_feedback[ANALYSIS_KEY], json!(raw));
        assert!(!result.is_fallback());
    }

    #[test]
    fn non_numeric_grade_falls_back() {
        let raw = "Note: quinze\nCommentaires:";
        let result = interpret(raw);

        assert_eq!(result.grade, FALLBACK_GRADE);
        assert_eq!(result.max_grade, 20.0);
        assert_eq!(result.comments, vec![MANUAL_REVIEW_COMMENT]);
        assert!(result.detailed_feedback.contains_key(ERROR_KEY));
        assert_eq!(result.detailed_feedback[RAW_ANALYSIS_KEY], json!(raw));
    }

    #[test]
    fn missing_slash_is_rejected() {
        assert_eq!(
            parse_grading_response("Note: 15\nCommentaires:"),
            Err(InterpretError::MissingScale("Note: 15".to_string()))
        );
        assert!(interpret("Note: 15\nCommentaires:").is_fallback());
    }

    #[test]
    fn missing_colon_is_rejected() {
        assert!(matches!(
            parse_grading_response("15/20\n\n- ok"),
            Err(InterpretError::MissingLabel(_))
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_grading_response(""), Err(InterpretError::Empty));
        assert!(interpret("").is_fallback());
    }

    #[test]
    fn no_comment_lines_gives_empty_comments() {
        let result = interpret("Note: 12.5/20\nCommentaires:");
        assert_eq!(result.grade, 12.5);
        assert!(result.comments.is_empty());
        assert!(!result.is_fallback());

        let result = interpret("Note: 8/20");
        assert_eq!(result.grade, 8.0);
        assert!(result.comments.is_empty());
    }

    #[test]
    fn blank_lines_and_bullets() {
        let raw = "Note : 14 / 20\n\n- Bonne introduction\n\n   \nConclusion trop courte\n-Sans espace";
        let result = interpret(raw);

        assert_eq!(result.grade, 14.0);
        assert_eq!(
            result.comments,
            vec!["Bonne introduction", "Conclusion trop courte", "-Sans espace"]
        );
    }

    #[test]
    fn crlf_line_endings() {
        let result = interpret("Note: 17/20\r\nCommentaires:\r\n- Très bien\r\n");
        assert_eq!(result.grade, 17.0);
        assert_eq!(result.comments, vec!["Très bien"]);
    }

    #[test]
    fn stated_maximum_is_ignored() {
        let result = interpret("Note: 7/10\nCommentaires:\n- Moyen");
        assert_eq!(result.grade, 7.0);
        assert_eq!(result.max_grade, 20.0);
    }

    #[test]
    fn grade_comes_from_segment_after_first_colon() {
        let result = interpret("Note: 16/20: très bien\nCommentaires:");
        assert_eq!(result.grade, 16.0);
    }

    #[test]
    fn non_finite_grade_is_rejected() {
        assert!(matches!(
            parse_grading_response("Note: NaN/20"),
            Err(InterpretError::InvalidGrade(_))
        ));
        assert!(interpret("Note: inf/20").is_fallback());
    }

    #[test]
    fn interpretation_is_idempotent() {
        for raw in [
            "Note: 15/20\nCommentaires:\n- Bon travail",
            "Note: quinze\nCommentaires:",
        ] {
            assert_eq!(interpret(raw), interpret(raw));
        }
    }

    #[test]
    fn only_dash_space_marker_is_stripped() {
        let parsed =
            parse_grading_response("Note: 12/20\nCommentaires:\n-Sans espace\n- Avec espace -")
                .unwrap();
        assert_eq!(parsed.comments, vec!["-Sans espace", "Avec espace -"]);
    }
}
