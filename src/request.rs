//! Inbound relay request decoding

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Body accepted by the relay handlers
///
/// Fields are provider-specific; each relay reads the ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InboundRequest {
    /// Model override
    #[serde(default)]
    pub model: Option<String>,

    /// Chat messages (OpenAI and Anthropic)
    #[serde(default)]
    pub messages: Option<Value>,

    /// Prompt text (Gemini)
    #[serde(default)]
    pub prompt: Option<Value>,

    /// Token limit (OpenAI and Anthropic)
    #[serde(default)]
    pub max_tokens: Option<u64>,

    /// Token limit (Gemini)
    #[serde(default, rename = "maxOutputTokens")]
    pub max_output_tokens: Option<u64>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl InboundRequest {
    /// Decode a raw request body
    ///
    /// Bytes that are not JSON are a [`Error::MalformedBody`]; JSON of the
    /// wrong shape is [`Error::InvalidInput`].
    pub fn decode(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| Error::MalformedBody(e.to_string()))?;

        serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("Invalid request body: {}", e)))
    }

    /// Requested model, if a non-empty one was given
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }
}
