pub mod corrections;
pub mod documents;
pub mod health;
pub mod metrics;
pub mod ocr;

pub use corrections::{correct_batch, grade};
pub use documents::upload_document;
pub use health::health_check;
pub use self::metrics::metrics;
pub use ocr::correct_text;
