use serde::Deserialize;
use service_core::config::{self as core_config, get_env, parse_flag, parse_list};
use service_core::error::AppError;
use std::env;

/// Default multipart upload limit (10MB).
const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Default per-IP quota: 100 requests every 15 minutes.
const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

const DEFAULT_MISTRAL_API_URL: &str = "https://api.mistral.ai/v1";
const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
const DEFAULT_MISTRAL_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub debug: bool,
    pub security: SecurityConfig,
    pub mistral: MistralSettings,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret expected in the `health-check-token` header.
    pub health_check_token: String,
    pub cors_origins: Vec<String>,
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub upload_max_bytes: usize,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    /// Key the limiter on `X-Forwarded-For` instead of the peer address.
    pub trust_proxy: bool,
}

impl CorrectionConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CorrectionConfig {
            common: common_config,
            debug: parse_flag(&get_env("DEBUG", Some("false"), false)?),
            security: SecurityConfig {
                health_check_token: get_env("HEALTH_CHECK_TOKEN", None, is_prod)?,
                cors_origins: parse_list(&get_env("CORS_ORIGINS", Some("*"), false)?),
                allowed_hosts: parse_list(&get_env("ALLOWED_HOSTS", Some("*"), false)?),
            },
            mistral: MistralSettings {
                api_key: get_env("MISTRAL_API_KEY", None, is_prod)?,
                api_url: get_env("MISTRAL_API_URL", Some(DEFAULT_MISTRAL_API_URL), false)?,
                model: get_env("MISTRAL_MODEL", Some(DEFAULT_MISTRAL_MODEL), false)?,
                timeout_secs: parse_or(
                    "MISTRAL_TIMEOUT_SECS",
                    DEFAULT_MISTRAL_TIMEOUT_SECS,
                )?,
            },
            limits: LimitsConfig {
                upload_max_bytes: parse_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
                rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS)?,
                rate_limit_window_secs: parse_or(
                    "RATE_LIMIT_WINDOW_SECS",
                    DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?,
                trust_proxy: parse_flag(&get_env("TRUST_PROXY", Some("false"), false)?),
            },
        })
    }

    /// Log level implied by the debug flag.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Read an optional numeric setting; a present but malformed value is an error.
fn parse_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, Some(&default.to_string()), false)?;
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}
