pub mod ranking;
pub mod scoring;
pub mod weights;

pub use ranking::{get_top_matches, to_ranked};
pub use scoring::{calculate_shift_matches, MatchingConfig, ShiftScorer};
pub use weights::{Weights, DEFAULT_WEIGHTS};
