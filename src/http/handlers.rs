//! Probe endpoints.
//!
//! `/health` reports on this process only. The status routes each resolve
//! one [`StatusKey`] through the backend and map the answer with
//! [`StatusReply`].

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::backend::{HttpBackend, StatusKey};
use crate::http::response::{ProbeOutcome, StatusReply};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Turns status requests into backend resolutions and probe outcomes.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<HttpBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self { backend }
    }

    pub async fn dispatch(&self, key: StatusKey) -> StatusReply {
        let outcome = match self.backend.resolve(key).await {
            Ok(true) => ProbeOutcome::Available,
            Ok(false) => ProbeOutcome::Unavailable,
            Err(e) => ProbeOutcome::Error(e.to_string()),
        };
        let reply = StatusReply::new(key, outcome);
        metrics::record_probe(key.as_str(), reply.status_code().as_u16());
        reply
    }
}

/// Liveness of the facade itself; never touches the backend.
pub async fn health() -> Json<Value> {
    Json(json!({"healthy": true}))
}

pub async fn primary(State(state): State<AppState>) -> StatusReply {
    state.dispatcher.dispatch(StatusKey::Primary).await
}

pub async fn read_write(State(state): State<AppState>) -> StatusReply {
    state.dispatcher.dispatch(StatusKey::ReadWrite).await
}

pub async fn replica(State(state): State<AppState>) -> StatusReply {
    state.dispatcher.dispatch(StatusKey::Replica).await
}

pub async fn read_only(State(state): State<AppState>) -> StatusReply {
    state.dispatcher.dispatch(StatusKey::ReadOnly).await
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
}
