//! Built-in mock reference data
//!
//! Only wheat carries prediction series; corn and soybeans have no data.

use chrono::NaiveDate;

use crate::models::{
    Impact, NewsAlert, PredictionDataset, PricePoint, ReferenceData, Sentiment, WeatherSeries,
};
use crate::types::{Crop, Timeframe};

type Row = (i32, u32, u32, f64, f64);

const WHEAT_1WEEK: &[Row] = &[
    (2024, 3, 1, 220.0, 0.95),
    (2024, 3, 2, 225.0, 0.93),
    (2024, 3, 3, 223.0, 0.94),
    (2024, 3, 4, 228.0, 0.92),
    (2024, 3, 5, 230.0, 0.91),
    (2024, 3, 6, 227.0, 0.93),
    (2024, 3, 7, 232.0, 0.90),
];

const WHEAT_1MONTH: &[Row] = &[
    (2024, 3, 1, 220.0, 0.95),
    (2024, 3, 8, 225.0, 0.92),
    (2024, 3, 15, 230.0, 0.90),
    (2024, 3, 22, 228.0, 0.88),
    (2024, 3, 29, 235.0, 0.85),
];

const WHEAT_3MONTHS: &[Row] = &[
    (2024, 3, 1, 220.0, 0.95),
    (2024, 4, 1, 228.0, 0.85),
    (2024, 5, 1, 235.0, 0.80),
    (2024, 6, 1, 240.0, 0.75),
];

fn points(rows: &[Row]) -> Vec<PricePoint> {
    rows.iter()
        .filter_map(|&(year, month, day, price, confidence)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| PricePoint::new(date, price, confidence))
        })
        .collect()
}

pub fn predictions() -> PredictionDataset {
    PredictionDataset::new()
        .with_series(Crop::Wheat, Timeframe::OneWeek, points(WHEAT_1WEEK))
        .with_series(Crop::Wheat, Timeframe::OneMonth, points(WHEAT_1MONTH))
        .with_series(Crop::Wheat, Timeframe::ThreeMonths, points(WHEAT_3MONTHS))
}

pub fn weather() -> WeatherSeries {
    WeatherSeries::new(
        vec![20.0, 22.0, 21.0, 23.0, 25.0, 24.0, 22.0],
        vec![0.0, 5.0, 10.0, 2.0, 0.0, 0.0, 15.0],
        vec![50.0, 55.0, 60.0, 58.0, 52.0, 48.0, 65.0],
    )
}

pub fn news() -> Vec<NewsAlert> {
    vec![
        NewsAlert::new("Global wheat shortage expected", Impact::High, Sentiment::Negative),
        NewsAlert::new(
            "New sustainable farming techniques boost yield",
            Impact::Medium,
            Sentiment::Positive,
        ),
        NewsAlert::new("Trade agreement to affect grain prices", Impact::High, Sentiment::Neutral),
    ]
}

pub fn reference_data() -> ReferenceData {
    ReferenceData {
        predictions: predictions(),
        weather: weather(),
        news: news(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_reference_data;

    #[test]
    fn test_mock_series_sizes() {
        let dataset = predictions();
        assert_eq!(dataset.series(Crop::Wheat, Timeframe::OneWeek).unwrap().len(), 7);
        assert_eq!(dataset.series(Crop::Wheat, Timeframe::OneMonth).unwrap().len(), 5);
        assert_eq!(dataset.series(Crop::Wheat, Timeframe::ThreeMonths).unwrap().len(), 4);
        assert!(dataset.series(Crop::Soybeans, Timeframe::OneWeek).is_none());
    }

    #[test]
    fn test_mock_data_is_valid() {
        assert!(validate_reference_data(&reference_data()).is_ok());
    }

    #[test]
    fn test_mock_news() {
        let news = news();
        assert_eq!(news.len(), 3);
        assert_eq!(news.iter().filter(|alert| alert.is_high_impact()).count(), 2);
    }
}
