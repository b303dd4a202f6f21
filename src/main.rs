use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use fraud_signal_analyzer::config::Config;
use fraud_signal_analyzer::data::{self, RunSummary};
use fraud_signal_analyzer::evaluation::{self, pr_curve};
use fraud_signal_analyzer::plots;
use fraud_signal_analyzer::scoring::{score_table, scores};
use fraud_signal_analyzer::stats;

fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║        FRAUD SIGNAL SCORE — THRESHOLD EVALUATION         ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Input:      {:<43} ║", cfg.input_file);
    println!("║  Thresholds: {:<43} ║", format!("{:?}", cfg.thresholds));
    println!("║  Output dir: {:<43} ║", cfg.output_dir);
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let table = data::load_table(&cfg.input_file)?;
    let breakdowns = score_table(&table, &cfg.weights);
    let score_col = scores(&breakdowns);
    let labels = table.labels();

    let score_stats = stats::describe(&score_col);
    score_stats.print_summary("fraud_signal_score");
    println!(
        "\nLoaded {} rows. Baseline fraud rate: {:.4}%\n",
        table.len(),
        table.baseline_fraud_rate() * 100.0
    );

    // Fixed-threshold sweep
    println!("=== Fixed thresholds ===");
    let reports = evaluation::evaluate_all(&score_col, &labels, &cfg.thresholds);
    for report in &reports {
        report.print_summary();
    }

    let output_dir = Path::new(&cfg.output_dir);
    data::write_csv_rows(output_dir.join("ab_test_results.csv"), &reports)?;
    println!("\nSaved: ab_test_results.csv");

    evaluation::print_results_table(&reports);

    // Full precision-recall sweep over every observed score
    let curve = pr_curve(&score_col, &labels);
    plots::precision_recall_curve(&curve, Path::new(&cfg.plots_dir))?;
    println!("\nSaved: precision_recall_curve.png / .svg");

    let metrics: Vec<_> = reports.iter().map(|r| r.metrics_row()).collect();
    data::write_csv_rows(&cfg.metrics_file, &metrics)?;
    println!("Saved: {}", cfg.metrics_file);

    // Destination-account ranking
    let top = evaluation::top_risk_accounts(&table, &score_col, cfg.top_accounts);
    evaluation::print_account_table(&top);
    data::write_csv_rows(output_dir.join("top10_high_risk_accounts.csv"), &top)?;
    println!("\nSaved: top10_high_risk_accounts.csv");

    data::write_scored_table(&cfg.scored_out, &table, &breakdowns)?;

    let summary = RunSummary::new(
        &cfg.input_file,
        table.len(),
        table.baseline_fraud_rate(),
        &cfg.thresholds,
        score_stats,
    );
    data::write_run_summary(output_dir.join("run_summary.json"), &summary)?;

    println!("\nEvaluation complete.");
    Ok(())
}
