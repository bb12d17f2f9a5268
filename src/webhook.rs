//! HTTP endpoint the Bot API pushes updates to.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tracing::{debug, error, info, warn};

use crate::decode::decode_slice;
use crate::dispatch::HandlerRegistry;
use crate::filters::Filter;
use crate::storage::{persist_update, DocumentStore};
use crate::types::Update;

/// Header carrying the `secret_token` given to setWebhook.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Served with GET; not usable as the update path.
pub const HEALTH_PATH: &str = "/health";

/// Everything a request needs: optional filter, optional store, handlers.
#[derive(Clone)]
pub struct WebhookState {
    filter: Option<Filter>,
    store: Option<Arc<dyn DocumentStore>>,
    registry: Arc<HandlerRegistry>,
    secret_token: Option<String>,
}

impl WebhookState {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            filter: None,
            store: None,
            registry: Arc::new(registry),
            secret_token: None,
        }
    }

    /// Updates the filter rejects are acknowledged and otherwise dropped.
    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_secret_token(mut self, token: impl Into<String>) -> Self {
        self.secret_token = Some(token.into());
        self
    }

    /// Filter, persist, then dispatch one update.
    ///
    /// Returns `None` when the filter rejected it, else the number of
    /// handlers that ran.
    pub async fn process(&self, update: Update) -> Result<Option<usize>> {
        if let Some(filter) = &self.filter {
            if !filter.check(&update) {
                debug!("Update {} filtered out", update.update_id);
                return Ok(None);
            }
        }

        if let Some(store) = &self.store {
            persist_update(store.as_ref(), &update).await?;
        }

        let ran = self.registry.dispatch(update).await?;
        Ok(Some(ran))
    }
}

pub fn router(state: WebhookState, path: &str) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .route(HEALTH_PATH, get(health_check))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Bind `addr` and serve updates posted to `path` until the process exits.
pub async fn run_server(addr: SocketAddr, path: &str, state: WebhookState) -> Result<()> {
    let app = router(state, path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Webhook listening on http://{}{}", addr, path);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!("{} {} -> {}", method, path, response.status());
    response
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = &state.secret_token {
        let given = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if given != Some(expected.as_str()) {
            warn!("Rejected update with a missing or wrong secret token");
            return StatusCode::FORBIDDEN;
        }
    }

    let update: Update = match decode_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejected undecodable update: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    let update_id = update.update_id;

    match state.process(update).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!("Failed to process update {}: {:#}", update_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
