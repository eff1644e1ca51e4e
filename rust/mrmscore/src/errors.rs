// The scoring layer introduces no failure modes of its own; everything
// surfaces as a data-processing error from the model crate.
pub use peakgroup::errors::{
    DataProcessingError,
    Result,
};
