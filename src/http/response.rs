//! Response mapping.
//!
//! # Responsibilities
//! - Map a resolved status to an HTTP status code
//! - Render the JSON body named after the status key
//!
//! # Design Decisions
//! - Errors and confirmed negatives share 503; only the body tells them apart
//! - Bodies always carry the status key so probes can grep for it

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::backend::StatusKey;

/// Result of resolving one status for a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Available,
    Unavailable,
    /// The status could not be determined.
    Error(String),
}

impl ProbeOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeOutcome::Available => StatusCode::OK,
            ProbeOutcome::Unavailable | ProbeOutcome::Error(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// A probe answer for one status key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub key: StatusKey,
    pub outcome: ProbeOutcome,
}

impl StatusReply {
    pub fn new(key: StatusKey, outcome: ProbeOutcome) -> Self {
        Self { key, outcome }
    }

    pub fn status_code(&self) -> StatusCode {
        self.outcome.status_code()
    }

    /// `{"<key>": bool}`, plus `"error"` when the status is unknown.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            self.key.as_str().to_string(),
            Value::Bool(self.outcome == ProbeOutcome::Available),
        );
        if let ProbeOutcome::Error(message) = &self.outcome {
            body.insert("error".to_string(), Value::String(message.clone()));
        }
        Value::Object(body)
    }
}

impl IntoResponse for StatusReply {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_available() {
        let reply = StatusReply::new(StatusKey::Primary, ProbeOutcome::Available);
        assert_eq!(reply.status_code(), StatusCode::OK);
        assert_eq!(reply.body(), json!({"primary": true}));
    }

    #[test]
    fn test_unavailable() {
        let reply = StatusReply::new(StatusKey::ReadOnly, ProbeOutcome::Unavailable);
        assert_eq!(reply.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(reply.body(), json!({"read-only": false}));
    }

    #[test]
    fn test_error_shares_unavailable_status() {
        let reply = StatusReply::new(
            StatusKey::Replica,
            ProbeOutcome::Error("connection refused".into()),
        );
        assert_eq!(reply.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            reply.body(),
            json!({"replica": false, "error": "connection refused"})
        );
    }
}
