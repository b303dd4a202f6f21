use serde::{Deserialize, Serialize};

use crate::models::TransactionTable;

/// Weights and cut points for the additive fraud signal score.
///
/// The hard anomalies (mule pattern, double-sided ledger mismatch) carry the
/// heaviest weights; the behavioral flags contribute one point each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalWeights {
    pub mule_high: f64,
    pub both_mismatch: f64,
    pub dest_velocity: f64,
    pub pass_through: f64,
    pub many_senders: f64,
    pub dest_burst: f64,
    pub new_dest: f64,
    /// Minimum `mule_score_w` for the mule term to fire.
    pub mule_score_cut: f64,
    /// Minimum same-step destination transaction count for the burst term.
    pub dest_burst_min: u32,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            mule_high: 2.5,
            both_mismatch: 2.5,
            dest_velocity: 2.0,
            pass_through: 1.0,
            many_senders: 1.0,
            dest_burst: 1.0,
            new_dest: 1.0,
            mule_score_cut: 2.0,
            dest_burst_min: 3,
        }
    }
}

/// Weighted score components for one transaction.
///
/// Kept separate from the source indicator columns: scoring never mutates the
/// table, so running the derivation twice over the same input yields
/// identical results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub dest_tx_count_lifetime: u32,
    pub mule_score_w_high: f64,
    pub both_mismatch_weighted: f64,
    pub dest_velocity_weighted: f64,
    pub pass_through_weighted: f64,
    pub many_senders_weighted: f64,
    pub dest_burst_weighted: f64,
    pub new_dest_weighted: f64,
    pub fraud_signal_score: f64,
}

/// Compute the fraud signal score for every row of the table.
///
/// Lifetime destination counts are derived once across the full table before
/// any per-row term is evaluated; an account receiving exactly one
/// transaction total fires the new-destination term.
pub fn score_table(table: &TransactionTable, w: &SignalWeights) -> Vec<ScoreBreakdown> {
    let lifetime = table.dest_lifetime_counts();

    table
        .iter()
        .map(|t| {
            let dest_tx_count_lifetime = lifetime.get(&t.name_dest).copied().unwrap_or(0);

            let mule_score_w_high = if t.mule_score_w >= w.mule_score_cut {
                w.mule_high
            } else {
                0.0
            };
            let both_mismatch_weighted = if t.both_mismatch { w.both_mismatch } else { 0.0 };
            let dest_velocity_weighted = if t.is_dest_high_velocity {
                w.dest_velocity
            } else {
                0.0
            };
            let pass_through_weighted = if t.is_pass_through { w.pass_through } else { 0.0 };
            let many_senders_weighted = if t.is_many_senders { w.many_senders } else { 0.0 };
            let dest_burst_weighted = if t.dest_tx_count_step >= w.dest_burst_min {
                w.dest_burst
            } else {
                0.0
            };
            let new_dest_weighted = if dest_tx_count_lifetime == 1 {
                w.new_dest
            } else {
                0.0
            };

            let fraud_signal_score = mule_score_w_high
                + both_mismatch_weighted
                + dest_velocity_weighted
                + pass_through_weighted
                + many_senders_weighted
                + dest_burst_weighted
                + new_dest_weighted;

            ScoreBreakdown {
                dest_tx_count_lifetime,
                mule_score_w_high,
                both_mismatch_weighted,
                dest_velocity_weighted,
                pass_through_weighted,
                many_senders_weighted,
                dest_burst_weighted,
                new_dest_weighted,
                fraud_signal_score,
            }
        })
        .collect()
}

/// Pull just the final scores out of a breakdown column.
pub fn scores(breakdowns: &[ScoreBreakdown]) -> Vec<f64> {
    breakdowns.iter().map(|b| b.fraud_signal_score).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionTable;
    use crate::test_helpers::{make_table, tx, tx_with};

    #[test]
    fn all_indicators_active_sums_to_eleven() {
        // Unique destination, so the new-dest term fires too: full score is
        // 2.5 + 2.5 + 2 + 1 + 1 + 1 + 1.
        let table = make_table(&[tx_with("D1", 0, |t| {
            t.mule_score_w = 2.0;
            t.both_mismatch = true;
            t.is_dest_high_velocity = true;
            t.is_pass_through = true;
            t.is_many_senders = true;
            t.dest_tx_count_step = 3;
        })]);
        let b = &score_table(&table, &SignalWeights::default())[0];
        assert!((b.fraud_signal_score - 11.0).abs() < 1e-9);
        assert!((b.mule_score_w_high - 2.5).abs() < 1e-9);
        assert!((b.both_mismatch_weighted - 2.5).abs() < 1e-9);
        assert!((b.dest_velocity_weighted - 2.0).abs() < 1e-9);
        assert!((b.new_dest_weighted - 1.0).abs() < 1e-9);
    }

    #[test]
    fn quiet_row_scores_zero_except_new_dest() {
        let table = make_table(&[tx("D1", 50.0, 0)]);
        let b = &score_table(&table, &SignalWeights::default())[0];
        // The only active term is the single-lifetime-transaction flag.
        assert!((b.fraud_signal_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mule_cut_is_inclusive() {
        let table = make_table(&[
            tx_with("D1", 0, |t| t.mule_score_w = 1.99),
            tx_with("D2", 0, |t| t.mule_score_w = 2.0),
        ]);
        let b = score_table(&table, &SignalWeights::default());
        assert_eq!(b[0].mule_score_w_high, 0.0);
        assert!((b[1].mule_score_w_high - 2.5).abs() < 1e-9);
    }

    #[test]
    fn burst_cut_is_inclusive_at_three() {
        let table = make_table(&[
            tx_with("D1", 0, |t| t.dest_tx_count_step = 2),
            tx_with("D2", 0, |t| t.dest_tx_count_step = 3),
        ]);
        let b = score_table(&table, &SignalWeights::default());
        assert_eq!(b[0].dest_burst_weighted, 0.0);
        assert!((b[1].dest_burst_weighted - 1.0).abs() < 1e-9);
    }

    #[test]
    fn new_dest_requires_single_lifetime_transaction() {
        let table = make_table(&[
            tx("REPEAT", 10.0, 0),
            tx("REPEAT", 20.0, 0),
            tx("ONCE", 30.0, 0),
        ]);
        let b = score_table(&table, &SignalWeights::default());
        assert_eq!(b[0].new_dest_weighted, 0.0);
        assert_eq!(b[1].new_dest_weighted, 0.0);
        assert!((b[2].new_dest_weighted - 1.0).abs() < 1e-9);
        assert_eq!(b[0].dest_tx_count_lifetime, 2);
        assert_eq!(b[2].dest_tx_count_lifetime, 1);
    }

    #[test]
    fn scoring_is_idempotent() {
        let table = make_table(&[
            tx_with("D1", 1, |t| {
                t.mule_score_w = 3.0;
                t.is_pass_through = true;
            }),
            tx("D1", 5.0, 0),
        ]);
        let w = SignalWeights::default();
        let first = scores(&score_table(&table, &w));
        let second = scores(&score_table(&table, &w));
        assert_eq!(first, second);
    }

    #[test]
    fn score_is_invariant_to_row_order() {
        let rows = vec![
            tx_with("A", 1, |t| t.both_mismatch = true),
            tx("B", 5.0, 0),
            tx("A", 7.0, 0),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let w = SignalWeights::default();
        let forward = scores(&score_table(&TransactionTable::new(rows), &w));
        let mut backward = scores(&score_table(&TransactionTable::new(reversed), &w));
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn score_is_monotone_in_active_indicators() {
        // Adding one more active indicator can only raise the score.
        let base = make_table(&[tx_with("D1", 0, |t| t.is_pass_through = true)]);
        let more = make_table(&[tx_with("D1", 0, |t| {
            t.is_pass_through = true;
            t.is_many_senders = true;
        })]);
        let w = SignalWeights::default();
        let lo = score_table(&base, &w)[0].fraud_signal_score;
        let hi = score_table(&more, &w)[0].fraud_signal_score;
        assert!(hi > lo);
    }
}
