//! Proxy failure kinds and their HTTP mapping.
//!
//! Every failure the handler can hit is one variant here. The variant decides
//! the status code and the `{ error, details }` envelope returned to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Envelope message for rejected method/body.
pub const CLIENT_INPUT_MESSAGE: &str = "Method Not Allowed or missing body";

/// Envelope message when the upstream answers with a non-success status.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Erro da API Gemini";

/// Envelope message for local, parse and transport failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Not a POST, or no body. No upstream call was made.
    #[error("Method Not Allowed or missing body")]
    ClientInput,

    /// Upstream completed with a non-success status.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, details: Value },

    /// Inbound body is not valid JSON.
    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Inbound body is the JSON literal `null`; there are no fields to read.
    #[error("request body is null")]
    NullBody,

    /// Network failure talking to the upstream. The URL (which carries the
    /// credential) is stripped before the error is stored.
    #[error("{}", error_chain(.0))]
    Transport(#[source] reqwest::Error),

    /// Upstream body could not be parsed as JSON.
    #[error("invalid JSON from upstream: {0}")]
    InvalidUpstreamJson(#[source] serde_json::Error),
}

/// `err: cause: cause`, so transport details name the actual network problem.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Error body returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProxyError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ClientInput => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ClientInput => "client_error",
            Self::Upstream { .. } => "upstream_error",
            _ => "internal_error",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::ClientInput => ErrorEnvelope {
                error: CLIENT_INPUT_MESSAGE.to_string(),
                details: None,
            },
            Self::Upstream { details, .. } => ErrorEnvelope {
                error: UPSTREAM_ERROR_MESSAGE.to_string(),
                details: Some(details.clone()),
            },
            other => ErrorEnvelope {
                error: INTERNAL_ERROR_MESSAGE.to_string(),
                details: Some(Value::String(other.to_string())),
            },
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}
