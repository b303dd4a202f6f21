use serde::{Deserialize, Serialize};

use crate::scoring::SignalWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Inputs
    pub input_file: String,
    pub features_file: String,

    // Outputs
    pub output_dir: String,
    pub plots_dir: String,
    pub metrics_file: String,
    pub scored_out: String,

    // Evaluation
    pub thresholds: Vec<f64>,
    pub weights: SignalWeights,
    pub top_accounts: usize,
    pub high_risk_quantile: f64,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let thresholds: Vec<f64> = env("THRESHOLDS", "3,4,5,6")
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        let thresholds = if thresholds.is_empty() {
            vec![3.0, 4.0, 5.0, 6.0]
        } else {
            thresholds
        };

        let mut weights = SignalWeights::default();
        weights.mule_score_cut = env("MULE_SCORE_CUT", "2.0").parse().unwrap_or(2.0);
        weights.dest_burst_min = env("DEST_BURST_MIN", "3").parse().unwrap_or(3);

        let input_file = env("TRANSACTIONS_FILE", "Transaction_FE_plots.csv");

        Config {
            // The augmented table overwrites the input by default, matching
            // the historical pipeline; point SCORED_OUT elsewhere to keep the
            // input pristine.
            scored_out: env("SCORED_OUT", &input_file),
            input_file,
            features_file: env("FEATURES_FILE", "Transaction_FE_final.csv"),
            output_dir: env("OUTPUT_DIR", "ab_test_output"),
            plots_dir: env("PLOTS_DIR", "plots"),
            metrics_file: env("METRICS_FILE", "threshold_metrics.csv"),
            thresholds,
            weights,
            top_accounts: env("TOP_ACCOUNTS", "10").parse().unwrap_or(10),
            high_risk_quantile: env("HIGH_RISK_QUANTILE", "0.95").parse().unwrap_or(0.95),
            log_level: env("LOG_LEVEL", "info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_expectations() {
        let cfg = Config::from_env();
        assert_eq!(cfg.thresholds, vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(cfg.top_accounts, 10);
        assert!((cfg.high_risk_quantile - 0.95).abs() < 1e-9);
        assert_eq!(cfg.scored_out, cfg.input_file);
    }
}
