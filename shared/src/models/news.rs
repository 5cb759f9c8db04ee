//! Market news models

use serde::{Deserialize, Serialize};

/// Market-moving news headline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsAlert {
    pub title: String,
    pub impact: Impact,
    pub sentiment: Sentiment,
}

impl NewsAlert {
    pub fn new(title: impl Into<String>, impact: Impact, sentiment: Sentiment) -> Self {
        Self {
            title: title.into(),
            impact,
            sentiment,
        }
    }

    /// High-impact alerts are highlighted in red, the rest in yellow
    pub fn is_high_impact(&self) -> bool {
        self.impact == Impact::High
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Positive => write!(f, "positive"),
        }
    }
}
