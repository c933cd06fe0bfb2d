use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Text pulled out of an uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub file_id: String,
    pub text_content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl ExtractedDocument {
    pub fn new(
        text_content: String,
        filename: &str,
        size: usize,
        content_type: &str,
        document_type: Option<&str>,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("filename".to_string(), json!(filename));
        metadata.insert("size".to_string(), json!(size));
        metadata.insert("content_type".to_string(), json!(content_type));
        if let Some(document_type) = document_type {
            metadata.insert("document_type".to_string(), json!(document_type));
        }

        Self {
            file_id: Uuid::new_v4().to_string(),
            text_content,
            metadata,
        }
    }
}
