//! Mock provider servers for testing the relay offline
//!
//! This module provides wiremock-based mock servers for the OpenAI, Anthropic
//! and Gemini APIs, allowing tests to run without real API keys.

use crate::RelayConfig;
use serde_json::Value;
use wiremock::{
    matchers::{any, body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Relay configuration pointing one provider at a mock server
fn config_for(key_var: &str, key: &str, base_var: &str, base: String) -> RelayConfig {
    let vars = [
        (key_var.to_string(), key.to_string()),
        (base_var.to_string(), base),
    ];
    RelayConfig::from_lookup(|name| {
        vars.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    })
    .expect("mock relay config")
}

/// OpenAI mock server for testing
pub struct OpenAIMockServer {
    server: MockServer,
}

impl OpenAIMockServer {
    /// Create a new OpenAI mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of this mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Relay configuration that sends OpenAI calls here with a personal key
    pub fn relay_config(&self, api_key: &str) -> RelayConfig {
        config_for("OPENAI_API_KEY", api_key, "OPENAI_API_BASE", self.base_url())
    }

    /// Setup a mock response for chat completion
    pub async fn mock_chat_completion(&self, content: &str, total_tokens: u32) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "id": "chatcmpl-mock",
                    "object": "chat.completion",
                    "created": 1234567890,
                    "model": "gpt-4o",
                    "choices": [{
                        "index": 0,
                        "message": {
                            "role": "assistant",
                            "content": content
                        },
                        "finish_reason": "stop"
                    }],
                    "usage": {
                        "prompt_tokens": 10,
                        "completion_tokens": total_tokens - 10,
                        "total_tokens": total_tokens
                    }
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Accept exactly one call carrying the given token limit
    pub async fn expect_max_tokens(&self, max_tokens: u32) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "max_tokens": max_tokens })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "choices": []
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Setup a JSON error response
    pub async fn mock_error(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Setup a 200 response with an arbitrary body
    pub async fn mock_raw_success(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

/// Anthropic mock server for testing
pub struct AnthropicMockServer {
    server: MockServer,
}

impl AnthropicMockServer {
    /// Create a new Anthropic mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of this mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Relay configuration that sends Anthropic calls here
    pub fn relay_config(&self, api_key: &str) -> RelayConfig {
        config_for(
            "ANTHROPIC_API_KEY",
            api_key,
            "ANTHROPIC_BASE_URL",
            self.base_url(),
        )
    }

    /// Setup a mock response for a message
    pub async fn mock_message(&self, content: &str, total_tokens: u32) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant"))
            .and(header("anthropic-version", crate::provider::ANTHROPIC_VERSION))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "id": "msg-mock",
                    "type": "message",
                    "role": "assistant",
                    "content": [{
                        "type": "text",
                        "text": content
                    }],
                    "stop_reason": "end_turn",
                    "model": "claude-3-5-sonnet-20241022",
                    "usage": {
                        "input_tokens": 10,
                        "output_tokens": total_tokens - 10
                    }
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup an error response whose body is not JSON
    pub async fn mock_raw_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

/// Gemini mock server for testing
pub struct GeminiMockServer {
    server: MockServer,
}

impl GeminiMockServer {
    /// Create a new Gemini mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of this mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Relay configuration that sends Gemini calls here
    pub fn relay_config(&self, api_key: &str) -> RelayConfig {
        config_for("GOOGLE_API_KEY", api_key, "GOOGLE_API_BASE", self.base_url())
    }

    /// Setup a generate-content response for a model and key
    pub async fn mock_generate(&self, model: &str, api_key: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", model)))
            .and(query_param("key", api_key))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{ "text": text }]
                        },
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {
                        "promptTokenCount": 3,
                        "candidatesTokenCount": 5,
                        "totalTokenCount": 8
                    }
                })),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Fail verification if any request reaches the server
    pub async fn expect_no_calls(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
