//! Shared types and logic for the AgriPredict dashboard
//!
//! This crate contains the prediction model and derivation pipeline shared
//! between the backend and the browser client (via WASM).

pub mod deriver;
pub mod mock;
pub mod models;
pub mod sequence;
pub mod types;
pub mod validation;

pub use deriver::*;
pub use models::*;
pub use sequence::*;
pub use types::*;
pub use validation::*;
