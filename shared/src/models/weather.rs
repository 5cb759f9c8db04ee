//! Weather data models

use serde::{Deserialize, Serialize};

/// Temperature at which weather has no effect on price
pub const NEUTRAL_TEMPERATURE_CELSIUS: f64 = 22.0;

/// Daily forecast as three parallel series, indexed by forecast-day offset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherSeries {
    pub temperature: Vec<f64>,
    pub rainfall: Vec<f64>,
    pub humidity: Vec<f64>,
}

/// One forecast day taken from a [`WeatherSeries`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherDay {
    pub temperature_celsius: f64,
    pub rainfall_mm: f64,
    pub humidity_percent: f64,
}

/// Values shown on the weather cards (day 0 of the forecast)
pub type WeatherSummary = WeatherDay;

impl WeatherSeries {
    pub fn new(temperature: Vec<f64>, rainfall: Vec<f64>, humidity: Vec<f64>) -> Self {
        Self {
            temperature,
            rainfall,
            humidity,
        }
    }

    /// Number of days with an entry in every series
    pub fn len(&self) -> usize {
        self.temperature
            .len()
            .min(self.rainfall.len())
            .min(self.humidity.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forecast for day `offset`, if every series covers it
    pub fn day(&self, offset: usize) -> Option<WeatherDay> {
        Some(WeatherDay {
            temperature_celsius: *self.temperature.get(offset)?,
            rainfall_mm: *self.rainfall.get(offset)?,
            humidity_percent: *self.humidity.get(offset)?,
        })
    }

    /// Number of days the price adjustment can use.
    ///
    /// Only temperature and rainfall enter the price factor, so humidity does
    /// not limit it.
    pub fn adjustment_len(&self) -> usize {
        self.temperature.len().min(self.rainfall.len())
    }

    /// Price factor for day `offset`, if temperature and rainfall cover it
    pub fn price_factor_at(&self, offset: usize) -> Option<f64> {
        Some(price_factor(
            *self.temperature.get(offset)?,
            *self.rainfall.get(offset)?,
        ))
    }

    pub fn summary(&self) -> Option<WeatherSummary> {
        self.day(0)
    }

    /// True when the three series have the same length
    pub fn is_aligned(&self) -> bool {
        self.temperature.len() == self.rainfall.len() && self.rainfall.len() == self.humidity.len()
    }
}

impl WeatherDay {
    /// Multiplicative price factor for this day.
    ///
    /// Each degree above 22°C adds 1%, each millimetre of rain adds 0.1%.
    /// Humidity does not contribute.
    pub fn price_factor(&self) -> f64 {
        price_factor(self.temperature_celsius, self.rainfall_mm)
    }
}

fn price_factor(temperature_celsius: f64, rainfall_mm: f64) -> f64 {
    1.0 + (temperature_celsius - NEUTRAL_TEMPERATURE_CELSIUS) / 100.0 + rainfall_mm / 1000.0
}
