//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy and health handlers
//! - Wire up middleware (tracing, body limit, request ID)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::loader::join_errors;
use crate::config::validation::{validate_config, ValidationError};
use crate::config::ProxyConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::proxy::{proxy_handler, GeminiClient};

/// Errors raised while constructing the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GeminiClient>,
    pub cors_origin: HeaderValue,
    pub model: Arc<str>,
}

/// HTTP server for the Gemini proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Validates the config first: a config built in code skips the loader,
    /// and axum panics on an invalid or duplicate route.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::Validation)?;

        let client = GeminiClient::new(&config.upstream)?;
        if !client.has_api_key() {
            tracing::warn!(
                env = %config.upstream.api_key_env,
                "No API key configured; upstream calls will be rejected"
            );
        }

        let cors_origin = HeaderValue::from_str(&config.cors.allow_origin)
            .map_err(|_| {
                ServerError::Validation(vec![ValidationError::CorsOrigin(
                    config.cors.allow_origin.clone(),
                )])
            })?;

        let state = AppState {
            client: Arc::new(client),
            cors_origin,
            model: Arc::from(config.upstream.model.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new().route(&config.routes.health_path, get(health_handler));
        for path in config.routes.proxy_paths() {
            router = router.route(path, any(proxy_handler));
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Router with all layers applied, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.upstream.generate_content_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.to_string(),
    })
}
