#![doc = include_str!("../README.md")]

// Declare modules
pub mod errors;
pub mod models;
pub mod traits;

// Re-export main structures
pub use crate::models::{
    Array2D,
    PeakGroup,
    Trace,
    Transition,
};

// Re-export traits
pub use crate::traits::{
    PeakGroupLike,
    SignalToNoiseLike,
};

// Re-export errors
pub use crate::errors::DataProcessingError;
