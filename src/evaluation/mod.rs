pub mod accounts;
pub mod pr_curve;
pub mod threshold;

pub use accounts::{print_account_table, top_risk_accounts, AccountRisk};
pub use pr_curve::{pr_curve, PrPoint};
pub use threshold::{evaluate_all, print_results_table, ThresholdMetrics, ThresholdReport};
