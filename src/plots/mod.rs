pub mod curve;
pub mod density;
pub mod distribution;
pub mod mismatch;
pub mod style;

pub use curve::precision_recall_curve;
pub use density::{fraud_score_density, mule_score_density};
pub use distribution::{fraud_vs_nonfraud_amount, log_amount_distribution};
pub use mismatch::{mismatch_breakdown, mismatch_by_dest_activity, origin_mismatch_by_type};
