//! Custom Code Gateway - Main entry point
//!
//! Accepts inbound API calls over HTTP, resolves each one to a registered
//! custom code method by name, runs it once and returns its response.

mod config;
mod router;

use anyhow::Result;
use custom_code_sdk::MethodRegistry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;

/// Shared application state
pub struct AppState {
    pub config: GatewayConfig,
    pub methods: MethodRegistry,
}

/// Every custom code method this gateway serves
fn build_registry() -> Result<MethodRegistry> {
    let mut methods = MethodRegistry::new();
    hello_world_params::register(&mut methods)?;
    Ok(methods)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,custom_code_gateway=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Custom Code Gateway");

    let config = GatewayConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let methods = build_registry()?;
    tracing::info!(count = methods.len(), "Custom code methods registered");

    let addr = config.listen_addr();
    let state = Arc::new(AppState { config, methods });

    let app = router::create_gateway_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry() {
        let methods = build_registry().unwrap();

        assert!(methods.contains("hello_world_params"));
        assert_eq!(methods.len(), 1);
    }
}
