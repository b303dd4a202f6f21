use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use fraud_signal_analyzer::config::Config;
use fraud_signal_analyzer::data;
use fraud_signal_analyzer::plots;
use fraud_signal_analyzer::scoring::{score_table, scores};
use fraud_signal_analyzer::stats;

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║          FEATURE TABLE — DESCRIPTIVE PLOTS               ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Input:      {:<43} ║", cfg.features_file);
    println!("║  Plots dir:  {:<43} ║", cfg.plots_dir);
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let table = data::load_table(&cfg.features_file)?;
    println!("Shape: {} rows", table.len());
    for t in table.iter().take(5) {
        println!(
            "  {} {} {} amount={:.2} dest={} fraud={}",
            t.step, t.tx_type, t.name_orig, t.amount, t.name_dest, t.is_fraud
        );
    }
    println!("\nTransaction type counts:");
    for (tx_type, count) in table.type_counts() {
        println!("  {:<10} {}", tx_type.as_str(), count);
    }
    println!();

    let plots_dir = Path::new(&cfg.plots_dir);

    plots::log_amount_distribution(&table, plots_dir)?;
    plots::fraud_vs_nonfraud_amount(&table, plots_dir)?;
    plots::origin_mismatch_by_type(&table, plots_dir)?;
    plots::mismatch_by_dest_activity(&table, plots_dir)?;
    plots::mismatch_breakdown(&table, plots_dir)?;

    // Percentile table helps pick the high-risk cut by eye
    let mule = table.mule_scores();
    println!("Mule score percentiles:");
    for pct in [50u32, 75, 90, 95, 99] {
        println!(
            "  {}th percentile: {:.3}",
            pct,
            stats::quantile(&mule, f64::from(pct) / 100.0)
        );
    }
    plots::mule_score_density(&table, plots_dir)?;

    // High-risk tagging at the configured quantile
    let cut = stats::quantile(&mule, cfg.high_risk_quantile);
    let high_risk_count = table.iter().filter(|t| t.mule_score_w >= cut).count();
    let fraud_in_high_risk = table
        .iter()
        .filter(|t| t.mule_score_w >= cut && t.is_fraud == 1)
        .count();
    println!("\nThreshold: {cut:.3}");
    println!("High-risk transactions: {high_risk_count}");
    println!("Frauds within high-risk: {fraud_in_high_risk}");

    // Same derivation the evaluator uses, so the density chart cannot drift
    let breakdowns = score_table(&table, &cfg.weights);
    let score_col = scores(&breakdowns);
    plots::fraud_score_density(&score_col, &table.labels(), plots_dir)?;

    println!("\nAll plots saved under {}/", cfg.plots_dir);
    Ok(())
}
