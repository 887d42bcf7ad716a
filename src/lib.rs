//! Re-exports from all modules
mod client;
mod config;
mod message;
mod provider;
mod request;

pub mod gate;

#[cfg(test)]
mod mock_server;

use serde_json::Value;
use thiserror::Error;

/// Result type for chat-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for chat-relay operations
#[derive(Debug, Error)]
pub enum Error {
    /// Request body is not valid JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Request is missing a required field or has one of the wrong type
    #[error("{0}")]
    InvalidInput(String),

    /// Relay invoked with a method other than POST or OPTIONS
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No usable credential for the provider
    #[error("{0} API key not configured")]
    CredentialMissing(ProviderType),

    /// Provider answered with a non-2xx status
    #[error("{provider} API error ({status}): {message}")]
    Provider {
        provider: ProviderType,
        status: u16,
        message: String,
        details: Value,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Machine-checkable code carried in the `error` field of error responses
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedBody(_) => "malformed_body",
            Error::InvalidInput(_) => "invalid_input",
            Error::MethodNotAllowed => "method_not_allowed",
            Error::CredentialMissing(_) => "credential_missing",
            Error::Provider { .. } => "provider_error",
            Error::Http(_) | Error::Json(_) | Error::Config(_) => "internal_error",
        }
    }

    /// HTTP status reported to the caller
    pub fn status(&self) -> u16 {
        match self {
            Error::MalformedBody(_) | Error::InvalidInput(_) => 400,
            Error::MethodNotAllowed => 405,
            Error::Provider { status, .. } => *status,
            Error::CredentialMissing(_)
            | Error::Http(_)
            | Error::Json(_)
            | Error::Config(_) => 500,
        }
    }

    /// Whether this is a failure inside the relay rather than a caller or provider fault
    pub fn is_internal(&self) -> bool {
        self.code() == "internal_error"
    }
}

pub use client::{RelayClient, RelayReply};
pub use config::{
    CredentialTier, OpenAiPreset, ProviderConfigDescriptor, ProviderSettings, ProviderStatus,
    ProviderType, RelayConfig,
};
pub use message::{is_valid_message, prune_messages};
pub use provider::{
    AuthStyle, Outbound, Payload, ProviderSpec, TokenField, TokenLimit, ANTHROPIC_VERSION,
};
pub use request::InboundRequest;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_statuses() {
        assert_eq!(Error::MalformedBody("x".into()).status(), 400);
        assert_eq!(Error::InvalidInput("x".into()).code(), "invalid_input");
        assert_eq!(Error::MethodNotAllowed.status(), 405);
        assert_eq!(
            Error::CredentialMissing(ProviderType::Google).status(),
            500
        );
        assert_eq!(Error::Config("bad".into()).code(), "internal_error");
        assert!(Error::Config("bad".into()).is_internal());
    }

    #[test]
    fn test_provider_error_keeps_upstream_status() {
        let err = Error::Provider {
            provider: ProviderType::OpenAI,
            status: 429,
            message: "rate limited".to_string(),
            details: serde_json::json!({}),
        };
        assert_eq!(err.status(), 429);
        assert_eq!(err.code(), "provider_error");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_credential_missing_message() {
        let err = Error::CredentialMissing(ProviderType::Anthropic);
        assert_eq!(err.to_string(), "Anthropic API key not configured");
    }
}
