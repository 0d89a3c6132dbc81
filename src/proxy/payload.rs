//! Inbound request and upstream payload shapes.
//!
//! Field values are carried as opaque JSON. Nothing here checks that `prompt`
//! is a string or that `generationConfig` is an object; whatever the caller
//! sent is forwarded and the upstream decides.

use serde::Serialize;
use serde_json::Value;

use crate::proxy::error::ProxyError;

/// Body accepted from the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundRequest {
    /// `prompt`, absent when the caller omitted the key.
    pub prompt: Option<Value>,
    /// `generationConfig`, absent when the caller omitted the key.
    pub generation_config: Option<Value>,
}

impl InboundRequest {
    /// Parse a raw request body.
    ///
    /// Only the two known keys are read from an object; unknown keys are
    /// ignored and an explicit `null` is kept as `null`. Any other non-null
    /// JSON value (array, string, number, boolean) yields a request with both
    /// fields absent and is forwarded as such. A literal `null` body is
    /// rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self, ProxyError> {
        match serde_json::from_slice::<Value>(body).map_err(ProxyError::InvalidJson)? {
            Value::Object(mut fields) => Ok(Self {
                prompt: fields.remove("prompt"),
                generation_config: fields.remove("generationConfig"),
            }),
            Value::Null => Err(ProxyError::NullBody),
            _ => Ok(Self::default()),
        }
    }
}

/// Body sent to `generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
}

impl From<InboundRequest> for UpstreamPayload {
    fn from(request: InboundRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
            generation_config: request.generation_config,
        }
    }
}
