//! Business logic services for the AgriPredict dashboard

pub mod prediction;
pub mod session;

pub use prediction::PredictionService;
pub use session::SessionStore;
