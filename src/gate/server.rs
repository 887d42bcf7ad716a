//! Gateway HTTP server

use crate::gate::config::GatewayConfig;
use crate::gate::handlers::{self, GatewayState};
use crate::gate::response::CORS_HEADERS;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

/// Build the gateway router
pub fn router(state: GatewayState) -> Router {
    let [origin, headers, methods] = CORS_HEADERS;
    let cors = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            origin.0,
            HeaderValue::from_static(origin.1),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            headers.0,
            HeaderValue::from_static(headers.1),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            methods.0,
            HeaderValue::from_static(methods.1),
        ));

    Router::new()
        // Relay endpoints
        .route("/api/ask-ai", any(handlers::ask_openai))
        .route("/api/ask-claude", any(handlers::ask_anthropic))
        .route("/api/ask-gemini", any(handlers::ask_gemini))
        // Utility endpoints
        .route("/api/chatbot-config", any(handlers::chatbot_config))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

/// Start the gateway server
pub async fn start_server(config: GatewayConfig, state: GatewayState) -> anyhow::Result<()> {
    let app = router(state);

    // Create socket address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("Starting gateway on http://{}", addr);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Logging middleware
async fn logging_middleware(req: Request, next: Next) -> axum::response::Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    info!("{} {} {} {:?}", method, uri, status, duration);

    response
}
