//! Outbound provider client
//!
//! One relay is exactly one HTTP round trip: no retries, no fallback to a
//! second provider.

use super::{
    config::{ProviderType, RelayConfig},
    provider::{Outbound, Payload, ProviderSpec},
    request::InboundRequest,
    Error, Result,
};
use axum::body::Bytes;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Message used when a provider error body carries none
const FALLBACK_ERROR_MESSAGE: &str = "The provider API call failed";

/// Build an HTTP client with specified timeout
fn build_http_client(timeout: Duration) -> std::result::Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Successful provider response, passed through byte for byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    /// Raw JSON body returned by the provider
    pub body: Bytes,
}

/// HTTP client shared by all relay handlers
#[derive(Debug, Clone)]
pub struct RelayClient {
    http_client: HttpClient,
}

impl RelayClient {
    /// Create a new relay client
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(RelayClient {
            http_client: build_http_client(timeout)?,
        })
    }

    /// Validate, shape and forward one inbound request
    ///
    /// Validation runs before credential resolution, so a bad request is
    /// reported as such even when the provider is not configured.
    pub async fn relay(
        &self,
        config: &RelayConfig,
        provider: ProviderType,
        request: &InboundRequest,
    ) -> Result<RelayReply> {
        let payload = Payload::validate(provider, request)?;
        let spec = ProviderSpec::resolve(provider, config)?;
        self.send(spec.outbound(payload, request)).await
    }

    /// Send a shaped call and normalize the provider's answer
    pub async fn send(&self, call: Outbound) -> Result<RelayReply> {
        debug!("POST {} ({})", call.url, call.provider);

        let mut request = self.http_client.post(&call.url).json(&call.body);
        for (name, value) in &call.headers {
            request = request.header(*name, value);
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }

        // Transport errors carry the URL, and a query-string key with it.
        let response = request.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            let details: Value =
                serde_json::from_slice(&body).unwrap_or_else(|_| Value::Object(Default::default()));
            let message = details
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or(FALLBACK_ERROR_MESSAGE)
                .to_string();

            error!("{} API error ({}): {}", call.provider, status, details);

            return Err(Error::Provider {
                provider: call.provider,
                status: status.as_u16(),
                message,
                details,
            });
        }

        // The body is relayed untouched, but it must at least be JSON.
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;

        Ok(RelayReply { body })
    }
}
