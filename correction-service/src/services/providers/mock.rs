//! Mock provider implementation for testing.

use super::{CompletionProvider, CompletionRequest, ProviderError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Request as seen by the mock, with the attachment existence captured at call time.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub attachment_name: Option<String>,
    pub attachment_path: Option<std::path::PathBuf>,
    pub attachment_existed: bool,
}

/// Mock completion provider returning a canned reply.
#[derive(Clone)]
pub struct MockProvider {
    reply: Arc<Mutex<Result<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Ok(reply.into()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose every call fails with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Err(message.into()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let recorded = RecordedRequest {
            system: request.system.clone(),
            user: request.user.clone(),
            attachment_name: request.attachment.as_ref().map(|a| a.filename.clone()),
            attachment_path: request.attachment.as_ref().map(|a| a.path.clone()),
            attachment_existed: request
                .attachment
                .as_ref()
                .map(|a| a.path.exists())
                .unwrap_or(false),
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(recorded);
        }

        let reply = self
            .reply
            .lock()
            .map_err(|_| ProviderError::NotConfigured("Mock reply poisoned".to_string()))?
            .clone();

        reply.map_err(ProviderError::ApiError)
    }

    fn model(&self) -> &str {
        "mock"
    }
}
