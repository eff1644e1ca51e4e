#![doc = include_str!("../README.md")]

// Re export stuff from other crates ...
pub use peakgroup;

// Declare modules
pub mod errors;
pub mod scoring;
pub mod utils;

// Re-export main structures
pub use crate::scoring::MrmScorer;
pub use crate::scoring::scores::feature::{
    calc_rt_score,
    calc_separate_sn_score,
    calc_sn_score,
};
pub use crate::scoring::scores::library::{
    LibraryScores,
    calc_library_score,
};
pub use crate::utils::correlation::XCorrArray;

// Re-export errors
pub use crate::errors::DataProcessingError;
