//! Gateway configuration

use std::env;
use std::time::Duration;

/// Gateway configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Port for inbound API calls
    pub port: u16,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,

    /// Method execution timeout in seconds
    pub handler_timeout_secs: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("CUSTOM_CODE_GATEWAY_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("CUSTOM_CODE_GATEWAY_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),

            max_body_bytes: lookup("CUSTOM_CODE_GATEWAY_MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),

            handler_timeout_secs: lookup("CUSTOM_CODE_GATEWAY_HANDLER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
