//! Dashboard display settings

use serde::{Deserialize, Serialize};

use crate::models::NewsAlert;
use crate::types::{Crop, Timeframe};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// User-controlled dashboard state for one session.
///
/// Treated as a value: every change produces a new `DisplaySettings` that
/// replaces the previous one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub selected_crop: Crop,
    pub selected_timeframe: Timeframe,
    pub confidence_threshold: f64,
    pub show_confidence_interval: bool,
    pub weather_impact_enabled: bool,
    pub news_alerts_enabled: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            selected_crop: Crop::Wheat,
            selected_timeframe: Timeframe::OneWeek,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            show_confidence_interval: false,
            weather_impact_enabled: true,
            news_alerts_enabled: true,
        }
    }
}

impl DisplaySettings {
    /// Whether switching from `self` to `next` changes any derivation input.
    ///
    /// Only crop, timeframe, threshold and the weather toggle feed the
    /// derivation; the remaining flags are presentation-only.
    pub fn requires_rederive(&self, next: &DisplaySettings) -> bool {
        self.selected_crop != next.selected_crop
            || self.selected_timeframe != next.selected_timeframe
            || self.confidence_threshold.to_bits() != next.confidence_threshold.to_bits()
            || self.weather_impact_enabled != next.weather_impact_enabled
    }
}

/// News alerts to show under the given settings
pub fn visible_alerts<'a>(news: &'a [NewsAlert], settings: &DisplaySettings) -> &'a [NewsAlert] {
    if settings.news_alerts_enabled {
        news
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Impact, Sentiment};

    #[test]
    fn test_defaults() {
        let settings = DisplaySettings::default();
        assert_eq!(settings.selected_crop, Crop::Wheat);
        assert_eq!(settings.selected_timeframe, Timeframe::OneWeek);
        assert_eq!(settings.confidence_threshold, 0.8);
        assert!(!settings.show_confidence_interval);
        assert!(settings.weather_impact_enabled);
        assert!(settings.news_alerts_enabled);
    }

    #[test]
    fn test_presentation_flags_do_not_rederive() {
        let current = DisplaySettings::default();

        let toggled = DisplaySettings {
            show_confidence_interval: true,
            news_alerts_enabled: false,
            ..current
        };
        assert!(!current.requires_rederive(&toggled));

        let threshold = DisplaySettings {
            confidence_threshold: 0.9,
            ..current
        };
        assert!(current.requires_rederive(&threshold));

        let weather = DisplaySettings {
            weather_impact_enabled: false,
            ..current
        };
        assert!(current.requires_rederive(&weather));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: DisplaySettings =
            serde_json::from_str(r#"{"selected_crop":"corn","confidence_threshold":0.5}"#).unwrap();
        assert_eq!(settings.selected_crop, Crop::Corn);
        assert_eq!(settings.selected_timeframe, Timeframe::OneWeek);
        assert_eq!(settings.confidence_threshold, 0.5);
        assert!(settings.weather_impact_enabled);
    }

    #[test]
    fn test_visible_alerts_follow_toggle() {
        let news = vec![NewsAlert::new("Headline", Impact::High, Sentiment::Neutral)];
        let mut settings = DisplaySettings::default();
        assert_eq!(visible_alerts(&news, &settings).len(), 1);

        settings.news_alerts_enabled = false;
        assert!(visible_alerts(&news, &settings).is_empty());
    }
}
