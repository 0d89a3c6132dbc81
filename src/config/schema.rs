//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration for the Gemini proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream generative-language API settings.
    pub upstream: UpstreamConfig,

    /// Paths the proxy handler is mounted on.
    pub routes: RouteConfig,

    /// CORS headers attached to successful responses.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Server-held API credential.
///
/// Never printed: both `Debug` and `Display` redact the value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for building the upstream URL only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the API (no trailing slash).
    pub base_url: String,

    /// API version path segment.
    pub api_version: String,

    /// Model used for `generateContent`.
    pub model: String,

    /// Environment variable the credential is read from at load time.
    pub api_key_env: String,

    /// Credential. Takes precedence over `api_key_env` when set in the file.
    pub api_key: Option<ApiKey>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl UpstreamConfig {
    /// Endpoint for `generateContent`, without the credential.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.model
        )
    }
}

/// Paths the proxy handler answers on.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Primary proxy path.
    pub proxy_path: String,

    /// Extra paths served by the same handler (e.g. the old Netlify function path).
    pub aliases: Vec<String>,

    /// Health endpoint path.
    pub health_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            proxy_path: "/api/gemini-proxy".to_string(),
            aliases: vec!["/.netlify/functions/gemini-proxy".to_string()],
            health_path: "/health".to_string(),
        }
    }
}

impl RouteConfig {
    /// All paths the proxy handler is mounted on.
    pub fn proxy_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.proxy_path.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// CORS configuration for successful responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`.
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            // Wide open until the deployment's origin is pinned down.
            allow_origin: "*".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_url() {
        let upstream = UpstreamConfig::default();
        assert_eq!(
            upstream.generate_content_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent"
        );

        let upstream = UpstreamConfig {
            base_url: "http://127.0.0.1:9000/".into(),
            model: "gemini-pro".into(),
            ..UpstreamConfig::default()
        };
        assert_eq!(
            upstream.generate_content_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_api_key_redacted() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(<redacted>)");
        assert_eq!(key.to_string(), "<redacted>");
        assert_eq!(key.expose(), "super-secret");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            model = "gemini-1.5-pro"
            api_key = "k"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.model, "gemini-1.5-pro");
        assert_eq!(config.upstream.api_version, "v1beta");
        assert_eq!(config.upstream.api_key, Some(ApiKey::new("k")));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.cors.allow_origin, "*");
        assert_eq!(
            config.routes.proxy_paths().collect::<Vec<_>>(),
            vec!["/api/gemini-proxy", "/.netlify/functions/gemini-proxy"]
        );
    }
}
