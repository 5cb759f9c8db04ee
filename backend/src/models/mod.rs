//! Models for the AgriPredict server
//!
//! Re-exports models from the shared crate and adds API response models

pub use shared::models::*;
pub use shared::types::{Crop, Timeframe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::session::SessionSnapshot;

/// Everything the dashboard page renders for one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub settings: DisplaySettings,
    /// A derivation for the current settings is still in flight
    pub pending: bool,
    /// False renders the "select parameters" placeholder instead of the chart
    pub has_data: bool,
    pub predictions: Vec<PricePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_at: Option<DateTime<Utc>>,
    /// Weather cards, shown while weather impact is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSummary>,
    pub news: Vec<NewsAlert>,
}

impl SessionView {
    pub fn new(snapshot: SessionSnapshot, reference: &ReferenceData) -> Self {
        let settings = snapshot.settings;
        let (predictions, derived_at) = match snapshot.published {
            Some(published) => (published.points, Some(published.derived_at)),
            None => (Vec::new(), None),
        };
        let weather = settings
            .weather_impact_enabled
            .then(|| reference.weather.summary())
            .flatten();

        Self {
            id: snapshot.id,
            created_at: snapshot.created_at,
            settings,
            pending: snapshot.pending,
            has_data: !predictions.is_empty(),
            predictions,
            derived_at,
            weather,
            news: visible_alerts(&reference.news, &settings).to_vec(),
        }
    }
}

/// Stateless derivation response
#[derive(Debug, Clone, Serialize)]
pub struct PredictionsResponse {
    pub crop: String,
    pub timeframe: String,
    pub has_data: bool,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    pub series: WeatherSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WeatherSummary>,
}
