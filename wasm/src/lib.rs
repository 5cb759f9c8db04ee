//! WebAssembly module for the AgriPredict dashboard
//!
//! Provides client-side computation for:
//! - Prediction derivation against the built-in or a supplied data bundle
//! - Weather card values
//! - Stale-response guarding for delayed derivations
//!
//! Results cross the boundary as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::{validate_reference_data, PredictionDeriver, RequestSequencer};

/// Derivation result handed to the chart
#[derive(Debug, Serialize)]
struct ChartData<'a> {
    has_data: bool,
    points: &'a [PricePoint],
}

fn derive_json(
    reference: &ReferenceData,
    crop: &str,
    timeframe: &str,
    confidence_threshold: f64,
    weather_impact: bool,
) -> Result<String, String> {
    let derivation = PredictionDeriver::new(&reference.predictions, &reference.weather)
        .derive_by_name(crop, timeframe, confidence_threshold, weather_impact);

    serde_json::to_string(&ChartData {
        has_data: !derivation.is_empty(),
        points: &derivation.points,
    })
    .map_err(|e| format!("Cannot encode predictions: {}", e))
}

fn derive_from_json(
    reference_json: &str,
    crop: &str,
    timeframe: &str,
    confidence_threshold: f64,
    weather_impact: bool,
) -> Result<String, String> {
    let reference: ReferenceData = serde_json::from_str(reference_json)
        .map_err(|e| format!("Invalid reference data JSON: {}", e))?;
    validate_reference_data(&reference).map_err(|e| format!("Invalid reference data: {}", e))?;
    derive_json(&reference, crop, timeframe, confidence_threshold, weather_impact)
}

/// Derive chart points from the built-in mock data
#[wasm_bindgen]
pub fn derive_predictions(
    crop: &str,
    timeframe: &str,
    confidence_threshold: f64,
    weather_impact: bool,
) -> Result<String, JsValue> {
    let reference = shared::mock::reference_data();
    derive_json(&reference, crop, timeframe, confidence_threshold, weather_impact)
        .map_err(|e| JsValue::from_str(&e))
}

/// Derive chart points from a caller-supplied reference data bundle
#[wasm_bindgen]
pub fn derive_predictions_from(
    reference_json: &str,
    crop: &str,
    timeframe: &str,
    confidence_threshold: f64,
    weather_impact: bool,
) -> Result<String, JsValue> {
    derive_from_json(reference_json, crop, timeframe, confidence_threshold, weather_impact)
        .map_err(|e| JsValue::from_str(&e))
}

/// Built-in predictions, weather and news as JSON
#[wasm_bindgen]
pub fn mock_reference_data() -> Result<String, JsValue> {
    serde_json::to_string(&shared::mock::reference_data())
        .map_err(|e| JsValue::from_str(&format!("Cannot encode reference data: {}", e)))
}

/// Day-0 weather values for the weather cards, `null` without data
#[wasm_bindgen]
pub fn weather_summary() -> Result<String, JsValue> {
    serde_json::to_string(&shared::mock::weather().summary())
        .map_err(|e| JsValue::from_str(&format!("Cannot encode weather summary: {}", e)))
}

/// Guards a page against delayed derivation results for stale settings.
///
/// Call `issue` when settings change and keep the returned ticket with the
/// pending work; when the result arrives, render it only if
/// `should_publish(ticket)` is true.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct PredictionRequests {
    sequencer: RequestSequencer,
}

#[wasm_bindgen]
impl PredictionRequests {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> u64 {
        self.sequencer.issue().value()
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.sequencer.latest().map(|latest| latest.value()) == Some(ticket)
    }

    pub fn should_publish(&self, ticket: u64) -> bool {
        let current = self.is_current(ticket);
        if !current {
            log_stale(ticket);
        }
        current
    }
}

#[cfg(target_arch = "wasm32")]
fn log_stale(ticket: u64) {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "discarding stale prediction result #{}",
        ticket
    )));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_stale(_ticket: u64) {}
