//! Outbound client for the Gemini `generateContent` endpoint.
//!
//! # Responsibilities
//! - Hold the endpoint and injected credential
//! - Issue exactly one POST per call (no retries, no caching)
//! - Classify the result: success body, upstream error, transport/parse failure

use reqwest::Client;
use serde_json::Value;
use std::time::Instant;

use crate::config::{ApiKey, UpstreamConfig};
use crate::observability::metrics;
use crate::proxy::error::ProxyError;
use crate::proxy::payload::UpstreamPayload;

/// Client for the generative-language API.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: Option<ApiKey>,
}

impl GeminiClient {
    /// Build a client from upstream configuration.
    ///
    /// The transport keeps reqwest's defaults; no request timeout is set.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("gemini-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.generate_content_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint without the credential.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Send one `generateContent` request and return the upstream JSON body.
    pub async fn generate_content(&self, payload: &UpstreamPayload) -> Result<Value, ProxyError> {
        let mut request = self.http.post(&self.endpoint).json(payload);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.expose())]);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(ProxyError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ProxyError::transport)?;
        metrics::record_upstream_duration(status.as_u16(), start);

        tracing::debug!(
            status = %status,
            bytes = body.len(),
            "Upstream responded"
        );

        let value: Value =
            serde_json::from_slice(&body).map_err(ProxyError::InvalidUpstreamJson)?;

        if !status.is_success() {
            return Err(ProxyError::Upstream {
                status,
                details: value,
            });
        }

        Ok(value)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = UpstreamConfig {
            api_key: Some(ApiKey::new("secret")),
            ..UpstreamConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert!(client.has_api_key());
        assert!(client.endpoint().ends_with(":generateContent"));
        assert!(!client.endpoint().contains("secret"));

        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_missing_key() {
        let client = GeminiClient::new(&UpstreamConfig::default()).unwrap();
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_transport_failure_hides_credential() {
        // Reserve a port, then free it so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = UpstreamConfig {
            base_url: format!("http://{}", addr),
            api_key: Some(ApiKey::new("top-secret-key")),
            ..UpstreamConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let payload = UpstreamPayload::from(crate::proxy::payload::InboundRequest::default());

        let err = client.generate_content(&payload).await.unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)));
        assert!(!err.to_string().contains("top-secret-key"));
    }
}
