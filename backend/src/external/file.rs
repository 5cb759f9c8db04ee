//! JSON file data source
//!
//! The file holds a serialized [`ReferenceData`] bundle:
//!
//! ```json
//! {
//!   "predictions": { "wheat": { "1week": [{ "date": "2024-03-01", "price": 220.0, "confidence": 0.95 }] } },
//!   "weather": { "temperature": [20.0], "rainfall": [0.0], "humidity": [50.0] },
//!   "news": [{ "title": "Global wheat shortage expected", "impact": "high", "sentiment": "negative" }]
//! }
//! ```

use std::path::PathBuf;

use shared::{validate_reference_data, ReferenceData};

use super::DataSource;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct FileDataSource {
    path: PathBuf,
}

impl FileDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, contents: &str) -> AppResult<ReferenceData> {
        let data: ReferenceData = serde_json::from_str(contents).map_err(|e| {
            AppError::DataSource(format!("invalid JSON in {}: {}", self.path.display(), e))
        })?;

        validate_reference_data(&data)
            .map_err(|e| AppError::DataSource(format!("{}: {}", self.path.display(), e)))?;

        Ok(data)
    }
}

impl DataSource for FileDataSource {
    fn reference_data(&self) -> AppResult<ReferenceData> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::DataSource(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let data = self.parse(&contents)?;
        tracing::info!(
            path = %self.path.display(),
            crops = data.predictions.crops().count(),
            weather_days = data.weather.len(),
            news = data.news.len(),
            "Loaded reference data"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Crop, Timeframe};

    const BUNDLE: &str = r#"{
        "predictions": {
            "corn": {
                "1month": [
                    { "date": "2024-03-01", "price": 180.0, "confidence": 0.9 },
                    { "date": "2024-03-08", "price": 182.5, "confidence": 0.7 }
                ]
            }
        },
        "weather": { "temperature": [22.0], "rainfall": [0.0], "humidity": [40.0] }
    }"#;

    #[test]
    fn test_parse_bundle() {
        let source = FileDataSource::new("bundle.json");
        let data = source.parse(BUNDLE).unwrap();

        assert_eq!(data.predictions.series(Crop::Corn, Timeframe::OneMonth).unwrap().len(), 2);
        assert!(data.predictions.series(Crop::Wheat, Timeframe::OneWeek).is_none());
        assert!(data.news.is_empty());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let source = FileDataSource::new("bundle.json");
        let bad = BUNDLE.replace("182.5", "-3.0");

        match source.parse(&bad) {
            Err(AppError::DataSource(msg)) => assert!(msg.contains("predictions.corn.1month[1]")),
            other => panic!("expected data source error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_crop() {
        let source = FileDataSource::new("bundle.json");
        let bad = BUNDLE.replace("\"corn\"", "\"rice\"");
        assert!(matches!(source.parse(&bad), Err(AppError::DataSource(_))));
    }

    #[test]
    fn test_missing_file() {
        let source = FileDataSource::new("/nonexistent/agripredict/bundle.json");
        assert!(matches!(source.reference_data(), Err(AppError::DataSource(_))));
    }
}
