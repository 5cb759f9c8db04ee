//! Reference data bundle served to the dashboard

use serde::{Deserialize, Serialize};

use crate::models::{NewsAlert, PredictionDataset, WeatherSeries};

/// Everything a data source provides: predictions, weather and news
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceData {
    pub predictions: PredictionDataset,
    pub weather: WeatherSeries,
    #[serde(default)]
    pub news: Vec<NewsAlert>,
}
