pub mod arrays;
pub mod trace_set;

pub use arrays::Array2D;
pub use trace_set::{PeakGroup, Trace, Transition};
