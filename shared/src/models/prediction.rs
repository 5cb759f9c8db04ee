//! Price prediction models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Crop, Timeframe};

/// A single predicted price on a calendar date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    /// Model certainty in [0, 1]
    pub confidence: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64, confidence: f64) -> Self {
        Self {
            date,
            price,
            confidence,
        }
    }

    /// Copy of this point with a different price, confidence untouched
    pub fn with_price(&self, price: f64) -> Self {
        Self { price, ..*self }
    }
}

/// Prediction series keyed by crop, then timeframe
///
/// Each series is ordered by ascending date. Crops or timeframes without an
/// entry simply have no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PredictionDataset {
    series: BTreeMap<Crop, BTreeMap<Timeframe, Vec<PricePoint>>>,
}

impl PredictionDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series for a crop and timeframe
    pub fn insert(&mut self, crop: Crop, timeframe: Timeframe, points: Vec<PricePoint>) {
        self.series.entry(crop).or_default().insert(timeframe, points);
    }

    pub fn with_series(mut self, crop: Crop, timeframe: Timeframe, points: Vec<PricePoint>) -> Self {
        self.insert(crop, timeframe, points);
        self
    }

    pub fn series(&self, crop: Crop, timeframe: Timeframe) -> Option<&[PricePoint]> {
        self.series
            .get(&crop)
            .and_then(|by_timeframe| by_timeframe.get(&timeframe))
            .map(Vec::as_slice)
    }

    /// Crops that carry at least one series
    pub fn crops(&self) -> impl Iterator<Item = Crop> + '_ {
        self.series
            .iter()
            .filter(|(_, by_timeframe)| !by_timeframe.is_empty())
            .map(|(crop, _)| *crop)
    }

    /// Every populated series with its keys
    pub fn iter(&self) -> impl Iterator<Item = (Crop, Timeframe, &[PricePoint])> + '_ {
        self.series.iter().flat_map(|(crop, by_timeframe)| {
            by_timeframe
                .iter()
                .map(move |(timeframe, points)| (*crop, *timeframe, points.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
