pub mod correlation;
pub mod ranks;
pub mod similarity;
pub mod stats;
