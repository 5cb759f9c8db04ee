//! Domain models for the AgriPredict dashboard

mod news;
mod prediction;
mod reference;
mod settings;
mod weather;

pub use news::*;
pub use prediction::*;
pub use reference::*;
pub use settings::*;
pub use weather::*;
