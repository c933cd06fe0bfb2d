use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Host allow-list. A `*` entry accepts any host.
#[derive(Debug, Clone)]
pub struct TrustedHosts {
    hosts: Arc<Vec<String>>,
}

impl TrustedHosts {
    pub fn new(hosts: Vec<String>) -> Self {
        let hosts = hosts.into_iter().map(|h| h.to_ascii_lowercase()).collect();
        Self {
            hosts: Arc::new(hosts),
        }
    }

    pub fn allows_any(&self) -> bool {
        self.hosts.is_empty() || self.hosts.iter().any(|h| h == "*")
    }

    /// Check a raw `Host` header value, port included.
    pub fn is_allowed(&self, host_header: &str) -> bool {
        if self.allows_any() {
            return true;
        }

        let host = strip_port(host_header).to_ascii_lowercase();
        self.hosts.iter().any(|pattern| match pattern.strip_prefix("*.") {
            Some(suffix) => host.ends_with(&format!(".{}", suffix)),
            None => *pattern == host,
        })
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal: [::1]:8080
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

pub async fn trusted_host_middleware(
    State(trusted): State<TrustedHosts>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if trusted.allows_any() {
        return Ok(next.run(request).await);
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
        .unwrap_or_default();

    if !trusted.is_allowed(&host) {
        tracing::warn!(host = %host, "Rejected request with untrusted host");
        return Err(AppError::BadRequest(anyhow::anyhow!("Invalid host header")));
    }

    Ok(next.run(request).await)
}
