use serde::{Deserialize, Serialize};

/// Confusion-matrix metrics for one score threshold.
///
/// `lift` is NaN when the table contains no fraud at all; every other ratio
/// falls back to 0.0 on a zero denominator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdReport {
    pub threshold: f64,
    pub flagged_count: usize,
    pub fraud_in_flagged: usize,
    pub fraud_rate_in_flagged: f64,
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    pub precision: f64,
    pub recall: f64,
    pub fpr: f64,
    pub baseline_fraud_rate: f64,
    pub lift: f64,
}

/// Compact row for the threshold_metrics.csv table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    pub precision: f64,
    pub recall: f64,
    pub flagged: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

impl ThresholdReport {
    /// Evaluate one threshold. A row is predicted positive iff
    /// `score >= threshold`.
    pub fn evaluate(scores: &[f64], labels: &[u8], threshold: f64) -> Self {
        debug_assert_eq!(scores.len(), labels.len());

        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut tn = 0usize;
        for (&score, &label) in scores.iter().zip(labels) {
            let predicted = score >= threshold;
            match (label == 1, predicted) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }

        let flagged_count = tp + fp;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let fpr = ratio(fp, fp + tn);
        let baseline_fraud_rate = ratio(tp + fn_, labels.len());
        let lift = if baseline_fraud_rate > 0.0 {
            recall / baseline_fraud_rate
        } else {
            f64::NAN
        };

        Self {
            threshold,
            flagged_count,
            fraud_in_flagged: tp,
            fraud_rate_in_flagged: ratio(tp, flagged_count),
            tp,
            fp,
            fn_,
            tn,
            precision,
            recall,
            fpr,
            baseline_fraud_rate,
            lift,
        }
    }

    pub fn metrics_row(&self) -> ThresholdMetrics {
        ThresholdMetrics {
            threshold: self.threshold,
            tp: self.tp,
            fp: self.fp,
            fn_: self.fn_,
            tn: self.tn,
            precision: self.precision,
            recall: self.recall,
            flagged: self.flagged_count,
        }
    }

    pub fn print_summary(&self) {
        let lift = if self.lift.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.2}x", self.lift)
        };
        println!("\nThreshold = {}", self.threshold);
        println!("  Flagged: {}", self.flagged_count);
        println!(
            "  Fraud in flagged: {} (rate {:.3}%)",
            self.fraud_in_flagged,
            self.fraud_rate_in_flagged * 100.0
        );
        println!(
            "  TP={} FP={} FN={} TN={}",
            self.tp, self.fp, self.fn_, self.tn
        );
        println!(
            "  Precision={:.3}% | Recall={:.3}% | FPR={:.3}%",
            self.precision * 100.0,
            self.recall * 100.0,
            self.fpr * 100.0
        );
        println!(
            "  Baseline fraud={:.4}% | Lift={}",
            self.baseline_fraud_rate * 100.0,
            lift
        );
    }
}

/// Evaluate every threshold independently; output order matches input order.
pub fn evaluate_all(scores: &[f64], labels: &[u8], thresholds: &[f64]) -> Vec<ThresholdReport> {
    thresholds
        .iter()
        .map(|&t| ThresholdReport::evaluate(scores, labels, t))
        .collect()
}

pub fn print_results_table(reports: &[ThresholdReport]) {
    println!("\n=== Results Table ===");
    println!(
        "{:>9} {:>13} {:>16} {:>10} {:>8} {:>8} {:>8}",
        "threshold", "flagged_count", "fraud_in_flagged", "precision", "recall", "fpr", "lift"
    );
    for r in reports {
        let lift = if r.lift.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.2}", r.lift)
        };
        println!(
            "{:>9} {:>13} {:>16} {:>10.4} {:>8.4} {:>8.4} {:>8}",
            r.threshold, r.flagged_count, r.fraud_in_flagged, r.precision, r.recall, r.fpr, lift
        );
    }
}
