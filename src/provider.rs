//! Provider request shaping
//!
//! Every relay goes through the same steps: validate the payload, resolve a
//! [`ProviderSpec`] from configuration, then build one [`Outbound`] call.
//! The per-provider differences live in [`ProviderSpec`], not in separate handlers.

use crate::config::{CredentialTier, ProviderType, RelayConfig};
use crate::message::prune_messages;
use crate::request::InboundRequest;
use crate::{Error, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Anthropic API version sent with every messages call
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_TEMPERATURE: f64 = 0.7;

/// How the credential is attached to the outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// Key in a named header
    Header(&'static str),
    /// Key in a named query parameter
    Query(&'static str),
}

/// Inbound field that carries the requested token limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    /// `max_tokens`
    MaxTokens,
    /// `maxOutputTokens`
    MaxOutputTokens,
}

impl TokenField {
    fn read(&self, request: &InboundRequest) -> Option<u64> {
        match self {
            TokenField::MaxTokens => request.max_tokens,
            TokenField::MaxOutputTokens => request.max_output_tokens,
        }
    }
}

/// Default and optional ceiling for the token limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimit {
    pub default: u32,
    pub ceiling: Option<u32>,
}

impl TokenLimit {
    /// Resolve a requested limit; zero or absent means the default
    pub fn resolve(&self, requested: Option<u64>) -> u32 {
        let limit = requested
            .filter(|&n| n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(self.default);

        match self.ceiling {
            Some(ceiling) => limit.min(ceiling),
            None => limit,
        }
    }
}

/// Validated request content in the provider's list shape
///
/// Chat `messages` for OpenAI and Anthropic, `contents` for Gemini.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    items: Vec<Value>,
}

impl Payload {
    /// Check the fields a provider requires, before any credential lookup
    pub fn validate(provider: ProviderType, request: &InboundRequest) -> Result<Self> {
        let items = match provider {
            ProviderType::OpenAI => {
                let messages = required_messages(request)?;
                let pruned = prune_messages(messages);
                if pruned.is_empty() {
                    return Err(Error::InvalidInput(
                        "No valid messages: each needs a non-empty string role and content"
                            .to_string(),
                    ));
                }
                pruned
            }
            ProviderType::Anthropic => required_messages(request)?.to_vec(),
            ProviderType::Google => {
                // The model becomes a URL path segment on a keyed call.
                if let Some(model) = request.model() {
                    if !is_path_segment(model) {
                        return Err(Error::InvalidInput(format!("Invalid model name: {model}")));
                    }
                }
                match request.prompt.as_ref().and_then(Value::as_str) {
                    Some(prompt) if !prompt.is_empty() => {
                        vec![json!({ "parts": [{ "text": prompt }] })]
                    }
                    _ => return Err(Error::InvalidInput("Prompt is required".to_string())),
                }
            }
        };

        Ok(Payload { items })
    }

    /// Number of messages or contents entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the payload carries nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn is_path_segment(model: &str) -> bool {
    model
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !model.chars().all(|c| c == '.')
}

fn required_messages(request: &InboundRequest) -> Result<&[Value]> {
    request
        .messages
        .as_ref()
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::InvalidInput("Messages array is required".to_string()))
}

/// Everything needed to call one provider
#[derive(Clone)]
pub struct ProviderSpec {
    pub provider: ProviderType,
    pub api_base: String,
    pub auth: AuthStyle,
    pub default_model: String,
    pub token_field: TokenField,
    pub token_limit: TokenLimit,
    credential: String,
}

impl std::fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSpec")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .field("auth", &self.auth)
            .field("default_model", &self.default_model)
            .field("token_field", &self.token_field)
            .field("token_limit", &self.token_limit)
            .finish_non_exhaustive()
    }
}

impl ProviderSpec {
    /// Build the spec for a provider, failing if no credential is configured
    pub fn resolve(provider: ProviderType, config: &RelayConfig) -> Result<Self> {
        let (tier, credential) = config.credential(provider).ok_or_else(|| {
            warn!("{} API key not configured", provider);
            Error::CredentialMissing(provider)
        })?;

        match tier {
            CredentialTier::Default => info!("Using default {} API key", provider),
            CredentialTier::Personal => warn!("Using personal {} API key", provider),
            CredentialTier::Single => {}
        }

        let settings = config.settings(provider);
        let (auth, token_field, token_limit) = match provider {
            ProviderType::OpenAI => (
                AuthStyle::Bearer,
                TokenField::MaxTokens,
                TokenLimit {
                    default: config.openai_preset.default_max_tokens(),
                    ceiling: Some(5000),
                },
            ),
            ProviderType::Anthropic => (
                AuthStyle::Header("x-api-key"),
                TokenField::MaxTokens,
                TokenLimit {
                    default: 800,
                    ceiling: None,
                },
            ),
            ProviderType::Google => (
                AuthStyle::Query("key"),
                TokenField::MaxOutputTokens,
                TokenLimit {
                    default: 800,
                    ceiling: None,
                },
            ),
        };

        Ok(ProviderSpec {
            provider,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            auth,
            default_model: settings.model.clone(),
            token_field,
            token_limit,
            credential: credential.to_string(),
        })
    }

    /// Build the single outbound call for a validated request
    pub fn outbound(&self, payload: Payload, request: &InboundRequest) -> Outbound {
        let model = request.model().unwrap_or(&self.default_model).to_string();
        let max_tokens = self.token_limit.resolve(self.token_field.read(request));
        let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);

        info!(
            provider = %self.provider,
            model = %model,
            items = payload.len(),
            max_tokens,
            "Calling provider"
        );

        let (url, body) = match self.provider {
            ProviderType::OpenAI => (
                format!("{}/chat/completions", self.api_base),
                json!({
                    "model": model,
                    "messages": payload.items,
                    "max_tokens": max_tokens,
                    "temperature": temperature,
                }),
            ),
            ProviderType::Anthropic => (
                format!("{}/v1/messages", self.api_base),
                json!({
                    "model": model,
                    "max_tokens": max_tokens,
                    "messages": payload.items,
                }),
            ),
            ProviderType::Google => (
                format!("{}/v1beta/models/{}:generateContent", self.api_base, model),
                json!({
                    "contents": payload.items,
                    "generationConfig": {
                        "maxOutputTokens": max_tokens,
                        "temperature": temperature,
                    }
                }),
            ),
        };

        let mut headers = Vec::new();
        let mut query = Vec::new();
        match self.auth {
            AuthStyle::Bearer => {
                headers.push(("Authorization", format!("Bearer {}", self.credential)))
            }
            AuthStyle::Header(name) => headers.push((name, self.credential.clone())),
            AuthStyle::Query(name) => query.push((name, self.credential.clone())),
        }
        if self.provider == ProviderType::Anthropic {
            headers.push(("anthropic-version", ANTHROPIC_VERSION.to_string()));
        }

        Outbound {
            provider: self.provider,
            url,
            headers,
            query,
            body,
        }
    }
}

/// A fully shaped provider call
#[derive(Clone)]
pub struct Outbound {
    pub provider: ProviderType,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
    pub body: Value,
}
