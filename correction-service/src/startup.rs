//! Application startup and lifecycle management.

use crate::config::CorrectionConfig;
use crate::handlers;
use crate::services::providers::mistral::{MistralConfig, MistralProvider};
use crate::services::providers::CompletionProvider;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{
        create_ip_rate_limiter, ip_rate_limit_middleware, spawn_rate_limiter_cleanup,
        IpRateLimit,
    },
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
    trusted_host::{trusted_host_middleware, TrustedHosts},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: CorrectionConfig,
    pub provider: Arc<dyn CompletionProvider>,
    pub rate_limit: IpRateLimit,
    pub trusted_hosts: TrustedHosts,
}

impl AppState {
    pub fn new(config: CorrectionConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let rate_limit = IpRateLimit::new(
            create_ip_rate_limiter(
                config.limits.rate_limit_requests,
                config.limits.rate_limit_window_secs,
            ),
            config.limits.trust_proxy,
        );
        let trusted_hosts = TrustedHosts::new(config.security.allowed_hosts.clone());

        Self {
            config,
            provider,
            rate_limit,
            trusted_hosts,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin: {}", e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/upload/document",
            post(handlers::upload_document)
                .layer(DefaultBodyLimit::max(state.config.limits.upload_max_bytes)),
        )
        .route("/correction/batch", post(handlers::correct_batch))
        .route("/correction/grade", post(handlers::grade))
        .route("/api/correct", post(handlers::correct_text))
        .layer(from_fn_with_state(
            state.rate_limit.clone(),
            ip_rate_limit_middleware,
        ));

    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .merge(api_routes)
        .layer(from_fn_with_state(
            state.trusted_hosts.clone(),
            trusted_host_middleware,
        ))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Mistral provider described by `config`.
    pub async fn build(config: CorrectionConfig) -> Result<Self, AppError> {
        let provider = MistralProvider::new(MistralConfig {
            api_key: config.mistral.api_key.clone(),
            base_url: config.mistral.api_url.clone(),
            model: config.mistral.model.clone(),
            timeout: Duration::from_secs(config.mistral.timeout_secs),
        })?;

        tracing::info!(
            model = %config.mistral.model,
            base_url = %config.mistral.api_url,
            "Initialized Mistral provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: CorrectionConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let state = AppState::new(config, provider);
        spawn_rate_limiter_cleanup(
            state.rate_limit.limiter().clone(),
            RATE_LIMIT_CLEANUP_INTERVAL,
        );
        let router = build_router(state);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

