//! The proxy handler: one inbound request, at most one upstream call.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::time::Instant;

use crate::http::request::request_id;
use crate::http::response::success_response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::client::GeminiClient;
use crate::proxy::error::ProxyError;
use crate::proxy::payload::{InboundRequest, UpstreamPayload};

/// Check preconditions, build the payload and call the upstream once.
///
/// Returns `ClientInput` without touching the network when the method is not
/// POST or the body is empty.
pub async fn forward(
    client: &GeminiClient,
    method: &Method,
    body: &[u8],
) -> Result<Value, ProxyError> {
    if *method != Method::POST || body.is_empty() {
        return Err(ProxyError::ClientInput);
    }

    let inbound = InboundRequest::from_slice(body)?;
    let payload = UpstreamPayload::from(inbound);
    client.generate_content(&payload).await
}

/// Axum handler mounted on every proxy path, for every method.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        body_bytes = body.len(),
        "Proxying request"
    );

    match forward(&state.client, &method, &body).await {
        Ok(value) => {
            metrics::record_request("success", 200, start_time);
            success_response(value, &state.cors_origin)
        }
        Err(err) => {
            let status = err.status();
            match &err {
                ProxyError::ClientInput => {
                    tracing::warn!(request_id = %request_id, method = %method, "Rejected request");
                }
                ProxyError::Upstream { status, details } => {
                    tracing::error!(
                        request_id = %request_id,
                        status = %status,
                        details = %details,
                        "Upstream API error"
                    );
                }
                other => {
                    tracing::error!(request_id = %request_id, error = %other, "Proxy request failed");
                }
            }
            metrics::record_request(err.outcome(), status.as_u16(), start_time);
            err.into_response()
        }
    }
}
