//! Relay configuration
//!
//! Provider credentials, default models and API bases are read once at
//! process start and shared read-only between handlers. The environment is
//! only touched by [`RelayConfig::from_env`]; everything else goes through
//! [`RelayConfig::from_lookup`], so the credential policy can be exercised
//! with a plain map.
//!
//! Environment variables:
//! - `DEFAULT_OPENAI_API_KEY` - shared OpenAI key
//! - `OPENAI_API_KEY` - personal OpenAI key
//! - `OPENAI_PRESET` - `shared` (default) or `personal`
//! - `OPENAI_MODEL`, `OPENAI_API_BASE`
//! - `ANTHROPIC_API_KEY`, `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`
//! - `GOOGLE_API_KEY`, `GOOGLE_MODEL`, `GOOGLE_API_BASE`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// OpenAI chat completions
    OpenAI,
    /// Anthropic messages
    Anthropic,
    /// Google Gemini generate-content
    Google,
}

impl ProviderType {
    /// Get the default API base URL for this provider type
    pub fn default_base_url(&self) -> &str {
        match self {
            ProviderType::OpenAI => "https://api.openai.com/v1",
            ProviderType::Anthropic => "https://api.anthropic.com",
            ProviderType::Google => "https://generativelanguage.googleapis.com",
        }
    }

    /// Get the config key for this provider
    pub fn config_key(&self) -> &str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::Anthropic => "anthropic",
            ProviderType::Google => "google",
        }
    }

    /// Model used when the request does not name one
    pub fn default_model(&self) -> &str {
        match self {
            ProviderType::OpenAI => "gpt-4o",
            ProviderType::Anthropic => "claude-3-5-sonnet-20241022",
            ProviderType::Google => "gemini-flash-2.5",
        }
    }

    fn model_var(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OPENAI_MODEL",
            ProviderType::Anthropic => "ANTHROPIC_MODEL",
            ProviderType::Google => "GOOGLE_MODEL",
        }
    }

    fn api_base_var(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OPENAI_API_BASE",
            ProviderType::Anthropic => "ANTHROPIC_BASE_URL",
            ProviderType::Google => "GOOGLE_API_BASE",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderType::OpenAI => "OpenAI",
            ProviderType::Anthropic => "Anthropic",
            ProviderType::Google => "Google",
        };
        f.write_str(name)
    }
}

/// Which configured credential served a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTier {
    /// Shared key (`DEFAULT_OPENAI_API_KEY`)
    Default,
    /// Per-operator key (`OPENAI_API_KEY`)
    Personal,
    /// The only key a provider accepts
    Single,
}

/// OpenAI default bundle: credential order and token default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAiPreset {
    /// Shared key first, 3000 tokens by default
    #[default]
    Shared,
    /// Personal key first, 800 tokens by default
    Personal,
}

impl OpenAiPreset {
    /// Order in which the OpenAI credential tiers are tried
    pub fn key_order(&self) -> [CredentialTier; 2] {
        match self {
            OpenAiPreset::Shared => [CredentialTier::Default, CredentialTier::Personal],
            OpenAiPreset::Personal => [CredentialTier::Personal, CredentialTier::Default],
        }
    }

    /// Token limit used when the request does not set `max_tokens`
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            OpenAiPreset::Shared => 3000,
            OpenAiPreset::Personal => 800,
        }
    }
}

impl FromStr for OpenAiPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(OpenAiPreset::Shared),
            "personal" => Ok(OpenAiPreset::Personal),
            _ => Err(Error::Config(format!(
                "Invalid OpenAI preset: {}. Must be 'shared' or 'personal'",
                s
            ))),
        }
    }
}

/// API key that never shows up in debug output
#[derive(Clone, PartialEq, Eq)]
struct ApiKey(String);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn single(key: Option<&ApiKey>) -> Option<(CredentialTier, &str)> {
    key.map(|k| (CredentialTier::Single, k.0.as_str()))
}

/// Per-provider endpoint and model settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// API base URL
    pub api_base: String,

    /// Model used when the request omits one
    pub model: String,
}

/// Configuration shared by all relay handlers
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// OpenAI default bundle
    pub openai_preset: OpenAiPreset,

    openai: ProviderSettings,
    anthropic: ProviderSettings,
    google: ProviderSettings,

    default_openai_key: Option<ApiKey>,
    personal_openai_key: Option<ApiKey>,
    anthropic_key: Option<ApiKey>,
    google_key: Option<ApiKey>,
}

impl RelayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let key = |name: &str| get(name).map(ApiKey);
        let settings = |provider: ProviderType| ProviderSettings {
            api_base: get(provider.api_base_var())
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            model: get(provider.model_var())
                .unwrap_or_else(|| provider.default_model().to_string()),
        };

        let openai_preset = match get("OPENAI_PRESET") {
            Some(value) => value.parse()?,
            None => OpenAiPreset::default(),
        };

        Ok(RelayConfig {
            openai_preset,
            openai: settings(ProviderType::OpenAI),
            anthropic: settings(ProviderType::Anthropic),
            google: settings(ProviderType::Google),
            default_openai_key: key("DEFAULT_OPENAI_API_KEY"),
            personal_openai_key: key("OPENAI_API_KEY"),
            anthropic_key: key("ANTHROPIC_API_KEY"),
            google_key: key("GOOGLE_API_KEY"),
        })
    }

    /// Override the OpenAI preset
    pub fn with_openai_preset(mut self, preset: OpenAiPreset) -> Self {
        self.openai_preset = preset;
        self
    }

    /// Endpoint and model settings for a provider
    pub fn settings(&self, provider: ProviderType) -> &ProviderSettings {
        match provider {
            ProviderType::OpenAI => &self.openai,
            ProviderType::Anthropic => &self.anthropic,
            ProviderType::Google => &self.google,
        }
    }

    /// Resolve the credential for a provider, following the OpenAI preset order
    pub fn credential(&self, provider: ProviderType) -> Option<(CredentialTier, &str)> {
        match provider {
            ProviderType::OpenAI => self
                .openai_preset
                .key_order()
                .into_iter()
                .find_map(|tier| {
                    let key = match tier {
                        CredentialTier::Default => self.default_openai_key.as_ref(),
                        _ => self.personal_openai_key.as_ref(),
                    };
                    key.map(|k| (tier, k.0.as_str()))
                }),
            ProviderType::Anthropic => single(self.anthropic_key.as_ref()),
            ProviderType::Google => single(self.google_key.as_ref()),
        }
    }

    /// Whether a provider has a usable credential
    pub fn is_enabled(&self, provider: ProviderType) -> bool {
        self.credential(provider).is_some()
    }

    /// Snapshot of provider availability, without key material
    pub fn describe(&self) -> ProviderConfigDescriptor {
        let status = |provider: ProviderType| ProviderStatus {
            model: self.settings(provider).model.clone(),
            enabled: self.is_enabled(provider),
        };

        ProviderConfigDescriptor {
            openai: status(ProviderType::OpenAI),
            anthropic: status(ProviderType::Anthropic),
            google: status(ProviderType::Google),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "environment".to_string(),
        }
    }
}

/// Availability of a single provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Default model name
    pub model: String,

    /// Whether a credential is configured
    pub enabled: bool,
}

/// Response body of the config reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfigDescriptor {
    pub openai: ProviderStatus,
    pub anthropic: ProviderStatus,
    pub google: ProviderStatus,

    /// RFC 3339 time the snapshot was taken
    pub timestamp: String,

    /// Where the settings came from
    pub source: String,
}

impl ProviderConfigDescriptor {
    /// Whether at least one provider can be used
    pub fn any_enabled(&self) -> bool {
        self.openai.enabled || self.anthropic.enabled || self.google.enabled
    }
}
