//! Healthdesk - conversational health-advice intake service
//!
//! A Rust backend that walks each user through a short intake
//! conversation and answers with generated advice.

mod api;
mod config;
mod escalation;
mod facilities;
mod llm;
mod runtime;
mod session;
mod state_machine;
mod system_prompt;
mod weather;

use api::{create_router, AppState};
use axum::http::{header, HeaderValue, Method};
use config::AppConfig;
use runtime::ProductionRuntime;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthdesk=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    let directory = config.facility_directory()?;
    tracing::info!(cities = directory.len(), "Facility directory loaded");

    let runtime = ProductionRuntime::from_config(&config, directory)?;
    tracing::info!(
        model = %config.gemini_model,
        weather = config.owm_api_key.is_some(),
        session_ttl_secs = config.session_ttl.as_secs(),
        "Intake runtime initialized"
    );

    // Create application state
    let state = AppState::new(Arc::new(runtime));

    // Create router
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Healthdesk server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
