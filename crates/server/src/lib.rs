//! hapi-chat-server library crate
//!
//! Exposes `build_app`, `config` and the query pipeline for integration
//! tests. The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod middleware;
pub mod query;
mod routes;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{AgentSession, ClaudeClient};
use config::Config;
use query::{FhirQueryClient, QueryTool};

pub use middleware::request_id::REQUEST_ID_HEADER;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub tool: QueryTool,
    /// `None` when no Anthropic API key is configured
    pub claude: Option<ClaudeClient>,
    pub session: AgentSession,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tool: QueryTool::new(
                config.fhir_endpoint.clone(),
                FhirQueryClient::new(config.fhir_timeout),
            ),
            claude: config.anthropic_api_key.as_ref().map(|key| {
                let client = ClaudeClient::new(key.clone(), config.anthropic_model.clone());
                match &config.anthropic_api_url {
                    Some(url) => client.with_api_url(url.clone()),
                    None => client,
                }
            }),
            session: AgentSession::new(),
        }
    }
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(config: &Config) -> Router {
    let state = AppState::from_config(config);
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Rate-limited API routes
    let api_routes = routes::api_routes()
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let public_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
