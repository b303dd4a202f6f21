use serde::Serialize;

/// One point of the precision-recall sweep.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PrPoint {
    pub threshold: f64,
    pub recall: f64,
    pub precision: f64,
}

/// Sweep every distinct observed score as a threshold, ascending.
///
/// Uses the same inclusive-bound counts and zero-denominator policy as the
/// fixed-threshold evaluator; recall is non-increasing along the sweep.
pub fn pr_curve(scores: &[f64], labels: &[u8]) -> Vec<PrPoint> {
    let mut unique: Vec<f64> = scores.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();

    unique
        .into_iter()
        .map(|t| {
            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;
            for (&score, &label) in scores.iter().zip(labels) {
                let predicted = score >= t;
                match (label == 1, predicted) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            let precision = if tp + fp > 0 {
                tp as f64 / (tp + fp) as f64
            } else {
                0.0
            };
            let recall = if tp + fn_ > 0 {
                tp as f64 / (tp + fn_) as f64
            } else {
                0.0
            };
            PrPoint {
                threshold: t,
                recall,
                precision,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_unique_score() {
        let points = pr_curve(&[1.0, 2.0, 2.0, 3.0], &[0, 1, 0, 1]);
        assert_eq!(points.len(), 3);
        let ts: Vec<f64> = points.iter().map(|p| p.threshold).collect();
        assert_eq!(ts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn recall_non_increasing_along_sweep() {
        let scores = [0.0, 1.0, 2.5, 3.5, 5.0, 6.0, 7.5];
        let labels = [0, 1, 0, 1, 1, 0, 1];
        let points = pr_curve(&scores, &labels);
        for pair in points.windows(2) {
            assert!(pair[0].recall >= pair[1].recall);
        }
    }

    #[test]
    fn lowest_threshold_flags_everything() {
        let scores = [1.0, 2.0, 3.0];
        let labels = [0, 1, 1];
        let first = pr_curve(&scores, &labels)[0];
        // Everything flagged: recall 1, precision = baseline
        assert!((first.recall - 1.0).abs() < 1e-9);
        assert!((first.precision - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn all_non_fraud_gives_zero_recall() {
        let points = pr_curve(&[1.0, 2.0], &[0, 0]);
        assert!(points.iter().all(|p| p.recall == 0.0));
        assert!(points.iter().all(|p| p.precision == 0.0));
    }
}
