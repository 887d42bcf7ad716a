//! Relay gateway module
//!
//! Serves the relay and config-reporter handlers over HTTP.

pub mod config;
pub mod handlers;
pub mod response;
pub mod server;

pub use config::GatewayConfig;
pub use handlers::GatewayState;
pub use server::{router, start_server};
