//! Built-in mock data source

use shared::ReferenceData;

use super::DataSource;
use crate::error::AppResult;

/// Serves the hardcoded wheat predictions, weather and news
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDataSource;

impl DataSource for MockDataSource {
    fn reference_data(&self) -> AppResult<ReferenceData> {
        Ok(shared::mock::reference_data())
    }
}
