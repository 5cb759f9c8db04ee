//! HTTP handlers for the AgriPredict API

pub mod dashboard;
pub mod health;
pub mod reference;

pub use dashboard::*;
pub use health::*;
pub use reference::*;
