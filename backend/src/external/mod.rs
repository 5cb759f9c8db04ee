//! Reference data sources
//!
//! The dashboard only ever reads reference data through [`DataSource`], so a
//! real market feed can replace the mock data without touching derivation.

pub mod file;
pub mod mock;

pub use file::FileDataSource;
pub use mock::MockDataSource;

use shared::ReferenceData;

use crate::config::PredictionConfig;
use crate::error::AppResult;

/// Provider of predictions, weather and news
pub trait DataSource: Send + Sync {
    fn reference_data(&self) -> AppResult<ReferenceData>;
}

/// Pick the data source named by configuration
pub fn from_config(config: &PredictionConfig) -> Box<dyn DataSource> {
    match &config.data_file {
        Some(path) => Box::new(FileDataSource::new(path.clone())),
        None => Box::new(MockDataSource),
    }
}
