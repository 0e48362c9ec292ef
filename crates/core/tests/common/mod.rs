//! In-process stand-in for the upstream registry.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use bankwatch_core::{PageMode, UpstreamConfig};
use serde_json::{json, Value};

pub const JWT: &str = "stub.jwt.token";

#[derive(Clone)]
pub struct Stub {
    inner: Arc<Mutex<StubInner>>,
}

struct StubInner {
    auth_status: StatusCode,
    auth_body: Value,
    messages_status: StatusCode,
    /// Page bodies indexed by `offset / 20`.
    pages: Vec<Value>,
    auth_payloads: Vec<Value>,
    message_queries: Vec<String>,
    authorization: Vec<String>,
}

impl Stub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StubInner {
                auth_status: StatusCode::OK,
                auth_body: json!({ "jwt": JWT }),
                messages_status: StatusCode::OK,
                pages: Vec::new(),
                auth_payloads: Vec::new(),
                message_queries: Vec::new(),
                authorization: Vec::new(),
            })),
        }
    }

    pub fn auth_status(self, status: StatusCode) -> Self {
        self.inner.lock().unwrap().auth_status = status;
        self
    }

    pub fn auth_body(self, body: Value) -> Self {
        self.inner.lock().unwrap().auth_body = body;
        self
    }

    pub fn messages_status(self, status: StatusCode) -> Self {
        self.inner.lock().unwrap().messages_status = status;
        self
    }

    pub fn page(self, body: Value) -> Self {
        self.inner.lock().unwrap().pages.push(body);
        self
    }

    pub fn auth_hits(&self) -> usize {
        self.inner.lock().unwrap().auth_payloads.len()
    }

    pub fn auth_payloads(&self) -> Vec<Value> {
        self.inner.lock().unwrap().auth_payloads.clone()
    }

    pub fn message_hits(&self) -> usize {
        self.inner.lock().unwrap().message_queries.len()
    }

    pub fn message_queries(&self) -> Vec<String> {
        self.inner.lock().unwrap().message_queries.clone()
    }

    pub fn authorization_headers(&self) -> Vec<String> {
        self.inner.lock().unwrap().authorization.clone()
    }

    /// Serves the stub on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/v1/auth/", post(auth))
            .route("/v1/messages/", get(messages))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn auth(State(stub): State<Stub>, Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut inner = stub.inner.lock().unwrap();
    inner.auth_payloads.push(payload);
    (inner.auth_status, Json(inner.auth_body.clone()))
}

async fn messages(
    State(stub): State<Stub>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<Value>) {
    let query = query.unwrap_or_default();
    let offset = query
        .split('&')
        .find_map(|kv| kv.strip_prefix("offset="))
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut inner = stub.inner.lock().unwrap();
    inner.message_queries.push(query);
    if let Some(h) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
        inner.authorization.push(h.to_string());
    }

    let body = inner
        .pages
        .get(offset / 20)
        .cloned()
        .unwrap_or_else(|| json!({ "total": 0, "messages": [] }));
    (inner.messages_status, Json(body))
}

pub fn message(guid: &str, description: &str, date: &str) -> Value {
    json!({
        "guid": guid,
        "messageType": { "name": "BankruptcyArticle8", "description": description },
        "datePublish": date,
    })
}

/// `count` synthetic messages numbered from `start`.
pub fn messages_page(total: usize, start: usize, count: usize) -> Value {
    let msgs: Vec<Value> = (start..start + count)
        .map(|i| message(&format!("m-{i}"), "Notice", "2020-01-01T00:00:00"))
        .collect();
    json!({ "total": total, "messages": msgs })
}

pub fn config(base_url: &str, page_mode: PageMode) -> UpstreamConfig {
    UpstreamConfig::resolve(Some("demo"), Some("secret"), Some(base_url))
        .unwrap()
        .with_page_mode(page_mode)
}
