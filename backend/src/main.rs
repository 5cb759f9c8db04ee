//! AgriPredict - Backend Server
//!
//! Serves commodity price predictions, weather and market news to the
//! dashboard, with one settings slot and one published result per session.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use services::{PredictionService, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub predictions: PredictionService,
    pub sessions: SessionStore,
    /// Where the reference data came from, for the health endpoint
    pub data_source: Arc<str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agripredict_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting AgriPredict Server");
    tracing::info!("Environment: {}", config.environment);

    // Load reference data
    let data_source = match &config.prediction.data_file {
        Some(path) => path.display().to_string(),
        None => "mock".to_string(),
    };
    tracing::info!("Loading reference data from {}", data_source);
    let reference = external::from_config(&config.prediction).reference_data()?;

    // Create application state
    let state = AppState {
        predictions: PredictionService::new(Arc::new(reference), config.prediction.latency()),
        sessions: SessionStore::new(
            config.sessions.max_sessions,
            config.sessions.idle_timeout(),
        ),
        config: Arc::new(config.clone()),
        data_source: data_source.into(),
    };

    if state.sessions.spawn_idle_sweep().is_some() {
        tracing::info!(
            "Ending sessions idle for {}s",
            config.sessions.idle_timeout_secs
        );
    }

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| error::AppError::Configuration(format!("server.host: {}", e)))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgriPredict API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
