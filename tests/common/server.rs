//! Mock generation backend.
//!
//! An axum app bound to a free local port on its own tokio runtime, so the
//! blocking client under test can talk to it from a plain `#[test]`. It
//! answers every route with the next canned response and records each
//! request it receives.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::{future, stream};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    declared_length: Option<u64>,
}

impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self::bytes(status, "application/json", body.as_bytes().to_vec())
    }

    pub fn bytes(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body,
            declared_length: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Advertises `length` in `Content-Length` regardless of the real body.
    pub fn with_declared_length(mut self, length: u64) -> Self {
        self.declared_length = Some(length);
        self
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        // A streamed body has no known size, so the server sends the
        // declared header as is.
        let body = match self.declared_length {
            Some(_) => Body::from_stream(stream::once(future::ready(
                Ok::<_, Infallible>(Bytes::from(self.body)),
            ))),
            None => Body::from(self.body),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            headers.append(
                HeaderName::try_from(name.as_str()).expect("valid header name"),
                HeaderValue::from_str(value).expect("valid header value"),
            );
        }
        if let Some(length) = self.declared_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }
        response
    }
}

struct Backend {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Sender<RecordedRequest>>,
}

async fn respond(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };
    let _ = backend.requests.lock().expect("request log").send(recorded);

    match backend.responses.lock().expect("response queue").pop_front() {
        Some(response) => response.into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response(),
    }
}

/// Mock backend bound to `127.0.0.1` on a free port.
pub struct MockServer {
    url: String,
    requests: Receiver<RecordedRequest>,
    _runtime: Runtime,
}

impl MockServer {
    /// Starts serving `responses` in order, one per request.
    pub fn start(responses: Vec<MockResponse>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("mock server runtime");

        let (tx, rx) = mpsc::channel();
        let backend = Arc::new(Backend {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(tx),
        });
        let app = Router::new().fallback(respond).with_state(backend);

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind mock server");
        let url = format!(
            "http://{}",
            listener.local_addr().expect("mock server address")
        );
        runtime.spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url,
            requests: rx,
            _runtime: runtime,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits for the next recorded request.
    pub fn next_request(&self) -> RecordedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(10))
            .expect("mock server should have received a request")
    }

    /// Returns true if no request arrives within a short grace period.
    pub fn received_nothing(&self) -> bool {
        self.requests
            .recv_timeout(Duration::from_millis(200))
            .is_err()
    }
}
