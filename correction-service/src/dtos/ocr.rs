use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrCorrectionRequest {
    pub text: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrCorrectionResponse {
    pub corrected_text: String,
    pub status: String,
    /// Share of the submitted words kept by the correction, in `[0, 1]`.
    pub confidence: f64,
}
