pub mod corrections;
pub mod ocr;

pub use corrections::CorrectionBatch;
pub use ocr::{OcrCorrectionRequest, OcrCorrectionResponse};
