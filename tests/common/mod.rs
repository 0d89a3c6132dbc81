//! Shared utilities for integration tests.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use gemini_proxy::config::{ApiKey, ProxyConfig};
use gemini_proxy::{HttpServer, Shutdown};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Key configured on proxies started by these helpers.
pub const TEST_API_KEY: &str = "test-key-123";

/// One request seen by the mock upstream.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Requests received by a mock upstream.
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

type Reply = Arc<dyn Fn() -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    recorder: Recorder,
    reply: Reply,
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.recorder.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let (status, body) = (state.reply)();
    let status = StatusCode::from_u16(status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Start a mock upstream answering every request with `reply()`.
pub async fn start_mock_upstream<F>(reply: F) -> (SocketAddr, Recorder)
where
    F: Fn() -> (u16, String) + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let state = MockState {
        recorder: recorder.clone(),
        reply: Arc::new(reply),
    };
    let app = Router::new().fallback(mock_handler).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, recorder)
}

/// Proxy config pointed at `upstream_base`.
pub fn proxy_config(upstream_base: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream_base.to_string();
    config.upstream.api_key = Some(ApiKey::new(TEST_API_KEY));
    config
}

/// A proxy server running on an ephemeral port.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn proxy_url(&self) -> String {
        self.url("/api/gemini-proxy")
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy with `config` and return once it is accepting.
pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningProxy { addr, shutdown }
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
