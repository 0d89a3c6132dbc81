//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0, addresses parse)
//! - Check the upstream endpoint is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - A missing credential is not an error; the upstream rejects it

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("upstream.base_url '{url}' is invalid: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("upstream.{0} must not be empty")]
    EmptyUpstreamField(&'static str),

    #[error("route '{0}' must start with '/'")]
    RoutePath(String),

    #[error("route '{0}' is declared more than once")]
    DuplicateRoute(String),

    #[error("cors.allow_origin '{0}' is not a valid header value")]
    CorsOrigin(String),

    #[error("security.max_body_size must be greater than zero")]
    BodyLimit,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let upstream = &config.upstream;
    match url::Url::parse(&upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::BaseUrl {
            url: upstream.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::BaseUrl {
            url: upstream.base_url.clone(),
            reason: e.to_string(),
        }),
    }
    if upstream.api_version.trim().is_empty() {
        errors.push(ValidationError::EmptyUpstreamField("api_version"));
    }
    if upstream.model.trim().is_empty() {
        errors.push(ValidationError::EmptyUpstreamField("model"));
    }

    let routes = &config.routes;
    let mut seen: Vec<&str> = Vec::new();
    for path in routes.proxy_paths().chain(std::iter::once(routes.health_path.as_str())) {
        if !path.starts_with('/') {
            errors.push(ValidationError::RoutePath(path.to_string()));
        }
        if seen.contains(&path) {
            errors.push(ValidationError::DuplicateRoute(path.to_string()));
        } else {
            seen.push(path);
        }
    }

    if axum::http::HeaderValue::from_str(&config.cors.allow_origin).is_err() {
        errors.push(ValidationError::CorsOrigin(config.cors.allow_origin.clone()));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
