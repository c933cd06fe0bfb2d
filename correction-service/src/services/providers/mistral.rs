//! Mistral AI provider implementation.
//!
//! Talks to the OpenAI-style `/chat/completions` endpoint. Attachments are
//! inlined as base64 `document_url` chunks next to the user text.

use super::{CompletionProvider, CompletionRequest, DocumentAttachment, ProviderError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mistral provider configuration.
#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Mistral chat completion provider.
pub struct MistralProvider {
    config: MistralConfig,
    client: Client,
}

impl MistralProvider {
    pub fn new(config: MistralConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn user_content(&self, request: &CompletionRequest) -> Result<MessageContent, ProviderError> {
        let Some(attachment) = &request.attachment else {
            return Ok(MessageContent::Text(request.user.clone()));
        };

        Ok(MessageContent::Parts(vec![
            ContentPart::Text {
                text: request.user.clone(),
            },
            attachment_part(attachment).await?,
        ]))
    }
}

async fn attachment_part(attachment: &DocumentAttachment) -> Result<ContentPart, ProviderError> {
    let bytes = tokio::fs::read(&attachment.path).await.map_err(|e| {
        ProviderError::Attachment(format!(
            "failed to read staged file for {}: {}",
            attachment.filename, e
        ))
    })?;

    Ok(ContentPart::DocumentUrl {
        document_url: format!(
            "data:{};base64,{}",
            attachment.mime_type,
            STANDARD.encode(bytes)
        ),
        document_name: Some(attachment.filename.clone()),
    })
}

#[async_trait]
impl CompletionProvider for MistralProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.system.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: self.user_content(request).await?,
                },
            ],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.user.len(),
            has_attachment = request.attachment.is_some(),
            "Sending request to Mistral API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Mistral API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "Mistral completion finished"
            );
        }

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// Mistral API types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text {
        text: String,
    },
    DocumentUrl {
        document_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        document_name: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
