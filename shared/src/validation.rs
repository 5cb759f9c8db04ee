//! Validation utilities for AgriPredict reference data
//!
//! Data loaded from outside the binary is checked once on load; derivation
//! itself never validates its inputs.

use thiserror::Error;

use crate::models::{NewsAlert, PricePoint, ReferenceData, WeatherSeries};

/// Validation failure with the location of the offending value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct ValidationError {
    pub location: String,
    pub message: &'static str,
}

impl ValidationError {
    fn at(location: impl Into<String>, message: &'static str) -> Self {
        Self {
            location: location.into(),
            message,
        }
    }
}

// ============================================================================
// Prediction Validations
// ============================================================================

/// Validate a single price point
pub fn validate_price_point(point: &PricePoint) -> Result<(), &'static str> {
    if !point.price.is_finite() {
        return Err("Price must be a finite number");
    }
    if point.price < 0.0 {
        return Err("Price cannot be negative");
    }
    validate_confidence(point.confidence)
}

/// Validate confidence lies in [0, 1]
pub fn validate_confidence(confidence: f64) -> Result<(), &'static str> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1");
    }
    Ok(())
}

/// Validate a series is ordered by strictly ascending date
pub fn validate_series_order(points: &[PricePoint]) -> Result<(), &'static str> {
    if points.windows(2).any(|pair| pair[0].date >= pair[1].date) {
        return Err("Price points must be ordered by ascending date");
    }
    Ok(())
}

// ============================================================================
// Weather Validations
// ============================================================================

/// Validate the three weather series line up and hold plausible values
pub fn validate_weather_series(weather: &WeatherSeries) -> Result<(), &'static str> {
    if !weather.is_aligned() {
        return Err("Temperature, rainfall and humidity series must have equal length");
    }
    let mut all_values = weather
        .temperature
        .iter()
        .chain(&weather.rainfall)
        .chain(&weather.humidity);
    if all_values.any(|value| !value.is_finite()) {
        return Err("Weather values must be finite numbers");
    }
    if weather.rainfall.iter().any(|mm| *mm < 0.0) {
        return Err("Rainfall cannot be negative");
    }
    if weather.humidity.iter().any(|pct| !(0.0..=100.0).contains(pct)) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// News Validations
// ============================================================================

pub fn validate_news_alert(alert: &NewsAlert) -> Result<(), &'static str> {
    if alert.title.trim().is_empty() {
        return Err("News alert title cannot be empty");
    }
    Ok(())
}

// ============================================================================
// Bundle Validation
// ============================================================================

/// Validate a full reference data bundle, reporting the first failure
pub fn validate_reference_data(data: &ReferenceData) -> Result<(), ValidationError> {
    for (crop, timeframe, points) in data.predictions.iter() {
        let location = format!("predictions.{}.{}", crop, timeframe);
        validate_series_order(points).map_err(|msg| ValidationError::at(&location, msg))?;
        for (i, point) in points.iter().enumerate() {
            validate_price_point(point)
                .map_err(|msg| ValidationError::at(format!("{}[{}]", location, i), msg))?;
        }
    }

    validate_weather_series(&data.weather).map_err(|msg| ValidationError::at("weather", msg))?;

    for (i, alert) in data.news.iter().enumerate() {
        validate_news_alert(alert).map_err(|msg| ValidationError::at(format!("news[{}]", i), msg))?;
    }

    Ok(())
}
