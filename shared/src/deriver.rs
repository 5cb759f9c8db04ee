//! Prediction derivation pipeline
//!
//! Turns the static prediction table into the points shown on the chart:
//! series lookup, confidence filter, then an optional positional weather
//! adjustment. Every step is pure; inputs are only borrowed.

use thiserror::Error;

use crate::models::{DisplaySettings, PredictionDataset, PricePoint, WeatherSeries};
use crate::types::{Crop, Timeframe};

/// Conditions absorbed during derivation.
///
/// None of these fail a derivation. They are reported alongside the points so
/// callers can log them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeriveIssue {
    #[error("no prediction data for {crop}/{timeframe}")]
    NoDataAvailable { crop: String, timeframe: String },

    /// Points from index `available` onward had no weather day
    #[error("weather series covers {available} days, {affected} point(s) left unadjusted")]
    IndexMisalignment { available: usize, affected: usize },
}

/// Result of a derivation with the issues absorbed on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub points: Vec<PricePoint>,
    pub issues: Vec<DeriveIssue>,
}

impl Derivation {
    fn no_data(crop: impl ToString, timeframe: impl ToString) -> Self {
        Self {
            points: Vec::new(),
            issues: vec![DeriveIssue::NoDataAvailable {
                crop: crop.to_string(),
                timeframe: timeframe.to_string(),
            }],
        }
    }

    /// Empty derivations render as the "no data" placeholder
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Derivation over a fixed prediction table and weather series
#[derive(Debug, Clone, Copy)]
pub struct PredictionDeriver<'a> {
    dataset: &'a PredictionDataset,
    weather: &'a WeatherSeries,
}

impl<'a> PredictionDeriver<'a> {
    pub fn new(dataset: &'a PredictionDataset, weather: &'a WeatherSeries) -> Self {
        Self { dataset, weather }
    }

    pub fn derive(
        &self,
        crop: Crop,
        timeframe: Timeframe,
        confidence_threshold: f64,
        weather_impact_enabled: bool,
    ) -> Vec<PricePoint> {
        self.derive_with_report(crop, timeframe, confidence_threshold, weather_impact_enabled)
            .points
    }

    pub fn derive_with_report(
        &self,
        crop: Crop,
        timeframe: Timeframe,
        confidence_threshold: f64,
        weather_impact_enabled: bool,
    ) -> Derivation {
        let Some(series) = self.dataset.series(crop, timeframe) else {
            return Derivation::no_data(crop, timeframe);
        };

        let retained = filter_by_confidence(series, confidence_threshold);
        if !weather_impact_enabled {
            return Derivation {
                points: retained,
                issues: Vec::new(),
            };
        }

        adjust_for_weather(retained, self.weather)
    }

    /// Derivation from raw identifiers; unknown names yield no data
    pub fn derive_by_name(
        &self,
        crop: &str,
        timeframe: &str,
        confidence_threshold: f64,
        weather_impact_enabled: bool,
    ) -> Derivation {
        match (crop.parse::<Crop>(), timeframe.parse::<Timeframe>()) {
            (Ok(crop), Ok(timeframe)) => self.derive_with_report(
                crop,
                timeframe,
                confidence_threshold,
                weather_impact_enabled,
            ),
            _ => Derivation::no_data(crop, timeframe),
        }
    }

    pub fn derive_for(&self, settings: &DisplaySettings) -> Derivation {
        self.derive_with_report(
            settings.selected_crop,
            settings.selected_timeframe,
            settings.confidence_threshold,
            settings.weather_impact_enabled,
        )
    }
}

/// Points to display for the given inputs
pub fn derive(
    dataset: &PredictionDataset,
    crop: Crop,
    timeframe: Timeframe,
    confidence_threshold: f64,
    weather_impact_enabled: bool,
    weather: &WeatherSeries,
) -> Vec<PricePoint> {
    PredictionDeriver::new(dataset, weather).derive(
        crop,
        timeframe,
        confidence_threshold,
        weather_impact_enabled,
    )
}

/// Keep points at or above the threshold, preserving order
fn filter_by_confidence(series: &[PricePoint], threshold: f64) -> Vec<PricePoint> {
    series
        .iter()
        .filter(|point| point.confidence >= threshold)
        .copied()
        .collect()
}

/// Scale each retained point by the weather of the same position.
///
/// Positions past the end of the weather series keep their price.
fn adjust_for_weather(points: Vec<PricePoint>, weather: &WeatherSeries) -> Derivation {
    let available = weather.adjustment_len();
    let affected = points.len().saturating_sub(available);

    let points = points
        .into_iter()
        .enumerate()
        .map(|(i, point)| match weather.price_factor_at(i) {
            Some(factor) => point.with_price(point.price * factor),
            None => point,
        })
        .collect();

    let issues = if affected > 0 {
        vec![DeriveIssue::IndexMisalignment {
            available,
            affected,
        }]
    } else {
        Vec::new()
    };

    Derivation { points, issues }
}
