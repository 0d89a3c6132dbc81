//! Success response construction.
//!
//! The upstream body is returned verbatim with JSON content type and the CORS
//! headers browsers need to call the proxy directly. Error responses carry no
//! CORS headers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Build the 200 response for a successful upstream call.
pub fn success_response(body: Value, allow_origin: &HeaderValue) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin.clone()),
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST")),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")),
        ],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_success_headers_and_body() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "hi" }] } }] });
        let response = success_response(body.clone(), &HeaderValue::from_static("*"));

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let echoed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(echoed, body);
    }
}
