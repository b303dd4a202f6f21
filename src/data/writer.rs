use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::TransactionTable;
use crate::scoring::ScoreBreakdown;
use crate::stats::ScoreStats;

/// Run-level metadata persisted next to the threshold results.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub input_file: String,
    pub rows: usize,
    pub baseline_fraud_rate: f64,
    pub thresholds: Vec<f64>,
    pub score: ScoreStats,
}

impl RunSummary {
    pub fn new(
        input_file: &str,
        rows: usize,
        baseline_fraud_rate: f64,
        thresholds: &[f64],
        score: ScoreStats,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            input_file: input_file.to_string(),
            rows,
            baseline_fraud_rate,
            thresholds: thresholds.to_vec(),
            score,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Serialize a slice of records to a headered CSV file.
pub fn write_csv_rows<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("cannot write {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!("Saved {} ({} rows)", path.display(), rows.len());
    Ok(())
}

pub fn write_run_summary<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

const SCORED_HEADER: &[&str] = &[
    "step",
    "type",
    "amount",
    "log_amount",
    "nameOrig",
    "nameDest",
    "isFraud",
    "origin_mismatch",
    "dest_mismatch",
    "either_mismatch",
    "both_mismatch",
    "mule_score_w",
    "is_dest_high_velocity",
    "is_pass_through",
    "is_many_senders",
    "dest_tx_count_step",
    "dest_tx_count_lifetime",
    "mule_score_w_high",
    "both_mismatch_weighted",
    "dest_velocity_weighted",
    "pass_through_weighted",
    "many_senders_weighted",
    "dest_burst_weighted",
    "new_dest_weighted",
    "fraud_signal_score",
];

fn flag(v: bool) -> String {
    u8::from(v).to_string()
}

/// Write the input table augmented with the score breakdown columns.
///
/// The source indicator columns pass through untouched; the derived columns
/// are appended, so the written table remains a valid scoring input.
pub fn write_scored_table<P: AsRef<Path>>(
    path: P,
    table: &TransactionTable,
    breakdowns: &[ScoreBreakdown],
) -> Result<()> {
    debug_assert_eq!(table.len(), breakdowns.len());
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("cannot write {}", path.display()))?;
    wtr.write_record(SCORED_HEADER)?;

    for (t, b) in table.iter().zip(breakdowns) {
        wtr.write_record(&[
            t.step.to_string(),
            t.tx_type.to_string(),
            t.amount.to_string(),
            t.log_amount.to_string(),
            t.name_orig.clone(),
            t.name_dest.clone(),
            t.is_fraud.to_string(),
            flag(t.origin_mismatch),
            flag(t.dest_mismatch),
            flag(t.either_mismatch),
            flag(t.both_mismatch),
            t.mule_score_w.to_string(),
            flag(t.is_dest_high_velocity),
            flag(t.is_pass_through),
            flag(t.is_many_senders),
            t.dest_tx_count_step.to_string(),
            b.dest_tx_count_lifetime.to_string(),
            b.mule_score_w_high.to_string(),
            b.both_mismatch_weighted.to_string(),
            b.dest_velocity_weighted.to_string(),
            b.pass_through_weighted.to_string(),
            b.many_senders_weighted.to_string(),
            b.dest_burst_weighted.to_string(),
            b.new_dest_weighted.to_string(),
            b.fraud_signal_score.to_string(),
        ])?;
    }
    wtr.flush()?;
    info!("Saved {} ({} rows)", path.display(), table.len());
    Ok(())
}
