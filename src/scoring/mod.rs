pub mod signal;

pub use signal::{score_table, scores, ScoreBreakdown, SignalWeights};
