pub mod scorer;
pub mod scores;

pub use scorer::MrmScorer;
pub use scores::feature::{
    calc_rt_score,
    calc_separate_sn_score,
    calc_sn_score,
};
pub use scores::library::{
    LibraryScores,
    calc_library_score,
};
