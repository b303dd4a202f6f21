use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::TransactionTable;

/// Per-destination-account risk aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRisk {
    #[serde(rename = "nameDest")]
    pub account: String,
    pub max_score: f64,
    pub avg_score: f64,
    pub total_score: f64,
    pub tx_count: usize,
    pub fraud_tx_count: usize,
}

/// Group transactions by destination account and rank by
/// (max score desc, total score desc), keeping the top `limit`.
///
/// The sort is stable, so accounts tied on both keys keep first-seen order;
/// no further tie-break is applied.
pub fn top_risk_accounts(
    table: &TransactionTable,
    scores: &[f64],
    limit: usize,
) -> Vec<AccountRisk> {
    debug_assert_eq!(table.len(), scores.len());

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, AccountRisk> = HashMap::new();

    for (t, &score) in table.iter().zip(scores) {
        let entry = groups.entry(t.name_dest.clone()).or_insert_with(|| {
            order.push(t.name_dest.clone());
            AccountRisk {
                account: t.name_dest.clone(),
                max_score: f64::NEG_INFINITY,
                avg_score: 0.0,
                total_score: 0.0,
                tx_count: 0,
                fraud_tx_count: 0,
            }
        });
        entry.max_score = entry.max_score.max(score);
        entry.total_score += score;
        entry.tx_count += 1;
        entry.fraud_tx_count += usize::from(t.is_fraud == 1);
    }

    let mut ranked: Vec<AccountRisk> = order
        .into_iter()
        .filter_map(|name| groups.remove(&name))
        .map(|mut a| {
            a.avg_score = a.total_score / a.tx_count as f64;
            a
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.max_score
            .total_cmp(&a.max_score)
            .then(b.total_score.total_cmp(&a.total_score))
    });
    ranked.truncate(limit);
    ranked
}

pub fn print_account_table(accounts: &[AccountRisk]) {
    println!("\nTop {} High-Risk Accounts:", accounts.len());
    println!(
        "{:<14} {:>9} {:>9} {:>11} {:>8} {:>14}",
        "nameDest", "max_score", "avg_score", "total_score", "tx_count", "fraud_tx_count"
    );
    for a in accounts {
        println!(
            "{:<14} {:>9.2} {:>9.3} {:>11.2} {:>8} {:>14}",
            a.account, a.max_score, a.avg_score, a.total_score, a.tx_count, a.fraud_tx_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_table, tx};

    #[test]
    fn tie_on_max_score_breaks_by_total_score() {
        // A: scores [5, 9] (sum 14), B: scores [9, 1] (sum 10).
        // Both max out at 9; A wins on total score.
        let table = make_table(&[
            tx("A", 10.0, 0),
            tx("A", 10.0, 0),
            tx("B", 10.0, 0),
            tx("B", 10.0, 0),
        ]);
        let scores = [5.0, 9.0, 9.0, 1.0];
        let ranked = top_risk_accounts(&table, &scores, 10);
        assert_eq!(ranked[0].account, "A");
        assert!((ranked[0].total_score - 14.0).abs() < 1e-9);
        assert_eq!(ranked[1].account, "B");
        assert!((ranked[1].total_score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn aggregates_per_account() {
        let table = make_table(&[tx("A", 1.0, 1), tx("A", 2.0, 0), tx("B", 3.0, 1)]);
        let scores = [4.0, 2.0, 6.0];
        let ranked = top_risk_accounts(&table, &scores, 10);

        let a = ranked.iter().find(|r| r.account == "A").unwrap();
        assert!((a.max_score - 4.0).abs() < 1e-9);
        assert!((a.avg_score - 3.0).abs() < 1e-9);
        assert!((a.total_score - 6.0).abs() < 1e-9);
        assert_eq!(a.tx_count, 2);
        assert_eq!(a.fraud_tx_count, 1);
    }

    #[test]
    fn limit_truncates_ranking() {
        let rows: Vec<_> = (0..15).map(|i| tx(&format!("D{i}"), 1.0, 0)).collect();
        let scores: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let table = make_table(&rows);
        let ranked = top_risk_accounts(&table, &scores, 10);
        assert_eq!(ranked.len(), 10);
        // Highest score first
        assert_eq!(ranked[0].account, "D14");
    }

    #[test]
    fn full_tie_keeps_first_seen_order() {
        let table = make_table(&[tx("X", 1.0, 0), tx("Y", 1.0, 0)]);
        let ranked = top_risk_accounts(&table, &[3.0, 3.0], 10);
        assert_eq!(ranked[0].account, "X");
        assert_eq!(ranked[1].account, "Y");
    }
}
