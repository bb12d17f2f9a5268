//! Loopback stand-in for the Bot API, used by unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub token: String,
    pub method: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    replies: Arc<HashMap<String, Value>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Answers every method with its canned reply, or `{"ok": true, "result": true}`.
pub struct MockApi {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    server: JoinHandle<()>,
}

impl MockApi {
    pub async fn start(replies: Vec<(&str, Value)>) -> Self {
        let replies = replies
            .into_iter()
            .map(|(method, reply)| (method.to_string(), reply))
            .collect::<HashMap<_, _>>();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let state = MockState {
            replies: Arc::new(replies),
            calls: calls.clone(),
        };

        let app = Router::new()
            .route("/{bot}/{method}", post(record_call))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            calls,
            server,
        }
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record_call(
    State(state): State<MockState>,
    Path((bot, method)): Path<(String, String)>,
    body: Bytes,
) -> Json<Value> {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.calls.lock().await.push(RecordedCall {
        token: bot.trim_start_matches("bot").to_string(),
        method: method.clone(),
        body,
    });

    let reply = state
        .replies
        .get(&method)
        .cloned()
        .unwrap_or_else(|| json!({"ok": true, "result": true}));
    Json(reply)
}
