//! Server configuration

use std::time::Duration;

use hapi_chat_core::{DEFAULT_ENDPOINT, Endpoint};

/// Server configuration loaded from environment variables
pub struct Config {
    /// FHIR server every query is sent to
    pub fhir_endpoint: Endpoint,
    pub bind_address: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,
    /// Messages API endpoint override, for proxies and gateways
    pub anthropic_api_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    /// Per-request timeout for FHIR queries; `None` keeps the transport default
    pub fhir_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            fhir_endpoint: Endpoint::new(
                std::env::var("HAPI_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            ),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            anthropic_model: non_empty_var("ANTHROPIC_MODEL"),
            anthropic_api_url: non_empty_var("ANTHROPIC_API_URL"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            fhir_timeout: std::env::var("FHIR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
