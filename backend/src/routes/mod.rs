//! Route definitions for the AgriPredict API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Dashboard sessions
        .nest("/sessions", session_routes())
        // Stateless prediction and reference data
        .route("/predictions", get(handlers::get_predictions))
        .route("/weather", get(handlers::get_weather))
        .route("/news", get(handlers::get_news))
}

/// Dashboard session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:session_id/settings", put(handlers::update_settings))
        .route("/:session_id/refresh", post(handlers::refresh_session))
}
