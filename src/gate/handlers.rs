//! HTTP request handlers for the gateway

use super::response::preflight;
use crate::{
    Error, InboundRequest, ProviderConfigDescriptor, ProviderType, RelayClient, RelayConfig,
    RelayReply,
};
use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

/// Gateway state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<RelayConfig>,
    pub client: RelayClient,
}

impl GatewayState {
    /// Create state from relay configuration and an outbound client
    pub fn new(config: RelayConfig, client: RelayClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

/// Handle OpenAI chat completions
pub async fn ask_openai(
    State(state): State<GatewayState>,
    method: Method,
    body: Bytes,
) -> Response {
    relay_handler(&state, ProviderType::OpenAI, method, body).await
}

/// Handle Anthropic messages
pub async fn ask_anthropic(
    State(state): State<GatewayState>,
    method: Method,
    body: Bytes,
) -> Response {
    relay_handler(&state, ProviderType::Anthropic, method, body).await
}

/// Handle Gemini generate-content
pub async fn ask_gemini(
    State(state): State<GatewayState>,
    method: Method,
    body: Bytes,
) -> Response {
    relay_handler(&state, ProviderType::Google, method, body).await
}

/// Report which providers are configured
///
/// Answers any method except the preflight as a read.
pub async fn chatbot_config(State(state): State<GatewayState>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return preflight();
    }

    let descriptor: ProviderConfigDescriptor = state.config.describe();
    if !descriptor.any_enabled() {
        warn!("No provider API keys are configured");
    }

    Json(descriptor).into_response()
}

/// Shared preflight, method gate and relay for one provider
async fn relay_handler(
    state: &GatewayState,
    provider: ProviderType,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return preflight();
    }

    match relay(state, provider, method, &body).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn relay(
    state: &GatewayState,
    provider: ProviderType,
    method: Method,
    body: &[u8],
) -> crate::Result<RelayReply> {
    if method != Method::POST {
        return Err(Error::MethodNotAllowed);
    }

    let request = InboundRequest::decode(body)?;
    state.client.relay(&state.config, provider, &request).await
}
