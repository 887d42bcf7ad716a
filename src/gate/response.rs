//! Response shapes shared by every handler

use crate::{Error, RelayReply};
use axum::{
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// Headers attached to every gateway response
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
];

/// Answer to a CORS preflight: 200 with an empty body
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}

/// Error body returned by every handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Machine-checkable error code
    pub error: String,

    /// Human-readable description
    pub message: String,

    /// Provider error body, when the failure came from the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// RFC 3339 time, set on internal errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(err: &Error) -> Self {
        let (message, details) = match err {
            Error::Provider {
                message, details, ..
            } => (message.clone(), Some(details.clone())),
            other => (other.to_string(), None),
        };

        ErrorEnvelope {
            error: err.code().to_string(),
            message,
            details,
            timestamp: err
                .is_internal()
                .then(|| chrono::Utc::now().to_rfc3339()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_internal() {
            error!("Relay failed: {}", self);
        }

        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(&self))).into_response()
    }
}

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}
