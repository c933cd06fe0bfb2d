#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use correction_service::config::{CorrectionConfig, LimitsConfig, MistralSettings, SecurityConfig};
use correction_service::services::providers::mock::MockProvider;
use correction_service::startup::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_HEALTH_TOKEN: &str = "test-health-token";
pub const MULTIPART_BOUNDARY: &str = "correction-test-boundary";

pub fn test_config() -> CorrectionConfig {
    CorrectionConfig {
        common: CoreConfig { port: 0 },
        debug: false,
        security: SecurityConfig {
            health_check_token: TEST_HEALTH_TOKEN.to_string(),
            cors_origins: vec!["*".to_string()],
            allowed_hosts: vec!["*".to_string()],
        },
        mistral: MistralSettings {
            api_key: "test-key".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            model: "mistral-test".to_string(),
            timeout_secs: 5,
        },
        limits: LimitsConfig {
            upload_max_bytes: 1024 * 1024,
            rate_limit_requests: 1000,
            rate_limit_window_secs: 60,
            trust_proxy: false,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: MockProvider,
}

impl TestApp {
    pub fn new(reply: &str) -> Self {
        Self::with_config(test_config(), MockProvider::new(reply))
    }

    pub fn with_config(config: CorrectionConfig, provider: MockProvider) -> Self {
        let state = AppState::new(config, Arc::new(provider.clone()));
        Self {
            router: build_router(state),
            provider,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed to respond")
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

/// Multipart body with an optional file part and an optional document_type part.
pub fn multipart_body(file: Option<(&str, &[u8])>, document_type: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(document_type) = document_type {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"document_type\"\r\n\r\n{v}\r\n",
                b = MULTIPART_BOUNDARY,
                v = document_type
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/pdf\r\n\r\n",
                b = MULTIPART_BOUNDARY,
                f = filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload/document")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
