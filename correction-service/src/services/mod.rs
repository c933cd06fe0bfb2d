pub mod correction;
pub mod extraction;
pub mod interpreter;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use correction::{correct_ocr_text, grade_copy, preservation_ratio};
pub use extraction::{extract_document, is_pdf_filename, UploadedFile};
pub use interpreter::{interpret, parse_grading_response, InterpretError};
pub use self::metrics::{get_metrics, init_metrics};
pub use providers::{CompletionProvider, CompletionRequest, ProviderError};
