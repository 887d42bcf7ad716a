//! chat-relay binary
//!
//! Relay gateway forwarding chat requests to OpenAI, Anthropic and Gemini

use anyhow::Result;
use chat_relay::gate::{start_server, GatewayConfig, GatewayState};
use chat_relay::{OpenAiPreset, ProviderType, RelayClient, RelayConfig};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

/// chat-relay: LLM relay gateway
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(about = "Relay gateway for OpenAI, Anthropic and Gemini", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Host to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Outbound request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// OpenAI preset: shared or personal (overrides OPENAI_PRESET)
    #[arg(long)]
    openai_preset: Option<OpenAiPreset>,

    /// Validate configuration
    #[arg(long)]
    validate: bool,
}

/// Find a config file in the default locations
fn default_config_file() -> Option<String> {
    let local = "./config.toml";
    if Path::new(local).exists() {
        return Some(local.to_string());
    }

    let home_config = dirs::home_dir()?.join(".chat-relay").join("config.toml");
    home_config
        .exists()
        .then(|| home_config.display().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config_file = args.config.clone().or_else(default_config_file);

    // Load configuration
    let mut gateway_config = if let Some(ref config_path) = config_file {
        tracing::info!("Loading config from: {}", config_path);
        GatewayConfig::load(config_path)?
    } else {
        tracing::info!("Using default configuration");
        GatewayConfig::default()
    };

    // Override with CLI arguments
    if let Some(host) = args.host {
        gateway_config.host = host;
    }
    if let Some(port) = args.port {
        gateway_config.port = port;
    }
    if let Some(timeout) = args.timeout {
        gateway_config.timeout_secs = timeout;
    }

    let mut relay_config = RelayConfig::from_env()?;
    if let Some(preset) = args.openai_preset {
        relay_config = relay_config.with_openai_preset(preset);
    }

    // Handle validation
    if args.validate {
        return validate_config(&gateway_config, &relay_config);
    }

    let client = RelayClient::new(gateway_config.timeout())?;
    start_server(gateway_config, GatewayState::new(relay_config, client)).await
}

/// Validate configuration
fn validate_config(config: &GatewayConfig, relay: &RelayConfig) -> Result<()> {
    println!("Configuration validation:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  OpenAI preset: {:?}", relay.openai_preset);

    config.validate()?;

    println!("  Providers:");
    for provider in [ProviderType::OpenAI, ProviderType::Anthropic, ProviderType::Google] {
        let settings = relay.settings(provider);
        let state = if relay.is_enabled(provider) {
            "enabled"
        } else {
            "no API key"
        };
        println!(
            "    - {} ({} via {}): {}",
            provider.config_key(),
            settings.model,
            settings.api_base,
            state
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
