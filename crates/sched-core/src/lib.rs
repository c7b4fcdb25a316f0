pub mod error;
pub mod grid;
pub mod occupancy;
pub mod validate;

pub use error::EngineError;
pub use validate::{validate, ValidationError};
