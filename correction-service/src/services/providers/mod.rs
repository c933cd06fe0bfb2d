//! Completion provider abstractions and implementations.
//!
//! The rest of the service only sees a prompt going in and a text blob coming
//! out; the provider decides how that maps onto a vendor API.

pub mod mistral;
pub mod mock;

use async_trait::async_trait;
use service_core::error::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no completion")]
    EmptyResponse,

    #[error("Attachment error: {0}")]
    Attachment(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::InternalError(anyhow::Error::new(err).context("Completion call failed"))
    }
}

/// A file staged on disk that should accompany the prompt.
#[derive(Debug, Clone)]
pub struct DocumentAttachment {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
}

/// One system + user exchange sent to the model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub attachment: Option<DocumentAttachment>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: DocumentAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Trait for text completion providers (e.g., Mistral).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a single completion and return the model's text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
