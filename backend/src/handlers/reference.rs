//! HTTP handlers for reference data and stateless predictions

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::models::{NewsAlert, PredictionsResponse, WeatherResponse, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::AppState;

/// Query parameters for a one-off prediction
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub crop: String,
    pub timeframe: String,
    pub confidence_threshold: Option<f64>,
    pub weather_impact: Option<bool>,
}

/// Derive predictions without a session.
///
/// Unknown crops or timeframes answer with an empty list, not an error.
pub async fn get_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionQuery>,
) -> Json<PredictionsResponse> {
    tokio::time::sleep(state.predictions.latency()).await;

    let derivation = state.predictions.derive_by_name(
        &query.crop,
        &query.timeframe,
        query.confidence_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
        query.weather_impact.unwrap_or(true),
    );

    Json(PredictionsResponse {
        has_data: !derivation.is_empty(),
        crop: query.crop,
        timeframe: query.timeframe,
        points: derivation.points,
    })
}

/// Weather series with the day-0 summary
pub async fn get_weather(State(state): State<AppState>) -> Json<WeatherResponse> {
    let weather = &state.predictions.reference_data().weather;
    Json(WeatherResponse {
        series: weather.clone(),
        summary: weather.summary(),
    })
}

pub async fn get_news(State(state): State<AppState>) -> Json<Vec<NewsAlert>> {
    Json(state.predictions.reference_data().news.clone())
}
