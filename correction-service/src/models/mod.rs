pub mod document;
pub mod grading;

pub use document::ExtractedDocument;
pub use grading::{GradingCriteria, GradingRequest, GradingResult, DEFAULT_MAX_GRADE};
