//! Prediction service running derivations against the loaded reference data

use std::sync::Arc;
use std::time::Duration;

use shared::{Derivation, DeriveIssue, DisplaySettings, PredictionDeriver, ReferenceData};

/// Derivation front end with the simulated remote-call latency
#[derive(Clone)]
pub struct PredictionService {
    data: Arc<ReferenceData>,
    latency: Duration,
}

impl PredictionService {
    pub fn new(data: Arc<ReferenceData>, latency: Duration) -> Self {
        Self { data, latency }
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn deriver(&self) -> PredictionDeriver<'_> {
        PredictionDeriver::new(&self.data.predictions, &self.data.weather)
    }

    /// Derive immediately for a settings value
    pub fn derive(&self, settings: &DisplaySettings) -> Derivation {
        let derivation = self.deriver().derive_for(settings);
        log_issues(&derivation);
        derivation
    }

    /// Derive from raw identifiers; unknown names yield no data
    pub fn derive_by_name(
        &self,
        crop: &str,
        timeframe: &str,
        confidence_threshold: f64,
        weather_impact_enabled: bool,
    ) -> Derivation {
        let derivation =
            self.deriver()
                .derive_by_name(crop, timeframe, confidence_threshold, weather_impact_enabled);
        log_issues(&derivation);
        derivation
    }

    /// Derive after the configured latency has elapsed
    pub async fn derive_delayed(&self, settings: DisplaySettings) -> Derivation {
        tokio::time::sleep(self.latency).await;
        self.derive(&settings)
    }
}

fn log_issues(derivation: &Derivation) {
    for issue in &derivation.issues {
        match issue {
            DeriveIssue::NoDataAvailable { .. } => tracing::debug!("{}", issue),
            DeriveIssue::IndexMisalignment { .. } => tracing::warn!("{}", issue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Crop, Timeframe};

    fn service() -> PredictionService {
        PredictionService::new(
            Arc::new(shared::mock::reference_data()),
            Duration::from_millis(1000),
        )
    }

    #[test]
    fn test_derive_default_settings() {
        let derivation = service().derive(&DisplaySettings::default());
        assert_eq!(derivation.points.len(), 7);
        assert!((derivation.points[0].price - 215.6).abs() < 1e-9);
    }

    #[test]
    fn test_derive_by_name_unknown_crop() {
        let derivation = service().derive_by_name("rice", "1week", 0.8, false);
        assert!(derivation.is_empty());
        assert_eq!(derivation.issues.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_derive_delayed_waits_for_latency() {
        let service = service();
        let settings = DisplaySettings {
            selected_crop: Crop::Wheat,
            selected_timeframe: Timeframe::OneMonth,
            weather_impact_enabled: false,
            ..DisplaySettings::default()
        };

        let started = tokio::time::Instant::now();
        let derivation = service.derive_delayed(settings).await;
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(derivation.points.len(), 5);
    }
}
