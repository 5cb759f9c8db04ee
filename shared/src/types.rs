//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Commodity a prediction series belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    #[default]
    Wheat,
    Corn,
    Soybeans,
}

impl Crop {
    pub const ALL: [Crop; 3] = [Crop::Wheat, Crop::Corn, Crop::Soybeans];

    pub fn code(&self) -> &'static str {
        match self {
            Crop::Wheat => "wheat",
            Crop::Corn => "corn",
            Crop::Soybeans => "soybeans",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Crop::Wheat => "Wheat",
            Crop::Corn => "Corn",
            Crop::Soybeans => "Soybeans",
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Crop {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crop::ALL
            .into_iter()
            .find(|crop| crop.code() == s)
            .ok_or_else(|| UnknownKey::Crop(s.to_string()))
    }
}

/// Prediction horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::OneWeek, Timeframe::OneMonth, Timeframe::ThreeMonths];

    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::OneWeek => "1week",
            Timeframe::OneMonth => "1month",
            Timeframe::ThreeMonths => "3months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneWeek => "1 Week",
            Timeframe::OneMonth => "1 Month",
            Timeframe::ThreeMonths => "3 Months",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Timeframe {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.code() == s)
            .ok_or_else(|| UnknownKey::Timeframe(s.to_string()))
    }
}

/// Identifier that does not name a known crop or timeframe
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnknownKey {
    #[error("unknown crop: {0}")]
    Crop(String),

    #[error("unknown timeframe: {0}")]
    Timeframe(String),
}

impl UnknownKey {
    /// Name of the settings field the identifier was meant for
    pub fn field(&self) -> &'static str {
        match self {
            UnknownKey::Crop(_) => "selected_crop",
            UnknownKey::Timeframe(_) => "selected_timeframe",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_codes_round_trip() {
        for crop in Crop::ALL {
            assert_eq!(crop.code().parse::<Crop>().unwrap(), crop);
        }
        assert_eq!(Crop::from_str("rice"), Err(UnknownKey::Crop("rice".to_string())));
    }

    #[test]
    fn test_timeframe_serde_uses_codes() {
        let json = serde_json::to_string(&Timeframe::ThreeMonths).unwrap();
        assert_eq!(json, "\"3months\"");

        let parsed: Timeframe = serde_json::from_str("\"1month\"").unwrap();
        assert_eq!(parsed, Timeframe::OneMonth);
    }

    #[test]
    fn test_unknown_timeframe() {
        let err = "2weeks".parse::<Timeframe>().unwrap_err();
        assert_eq!(err.field(), "selected_timeframe");
        assert_eq!(err.to_string(), "unknown timeframe: 2weeks");
    }
}
