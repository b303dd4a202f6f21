use fraud_signal_analyzer::models::{Transaction, TransactionTable, TxType};

/// A quiet transfer row with every indicator off.
pub fn tx(name_dest: &str, amount: f64, is_fraud: u8) -> Transaction {
    Transaction {
        step: 1,
        tx_type: TxType::Transfer,
        amount,
        log_amount: (amount + 1.0).ln(),
        name_orig: format!("C_{name_dest}"),
        name_dest: name_dest.to_string(),
        is_fraud,
        origin_mismatch: false,
        dest_mismatch: false,
        either_mismatch: false,
        both_mismatch: false,
        mule_score_w: 0.0,
        is_dest_high_velocity: false,
        is_pass_through: false,
        is_many_senders: false,
        dest_tx_count_step: 0,
    }
}

pub fn tx_with(name_dest: &str, is_fraud: u8, build: impl FnOnce(&mut Transaction)) -> Transaction {
    let mut t = tx(name_dest, 100.0, is_fraud);
    build(&mut t);
    t
}

/// A small table with a mix of loud fraud, quiet fraud, and clean rows.
pub fn sample_table() -> TransactionTable {
    TransactionTable::new(vec![
        // Loud mule-pattern frauds into M_HOT
        tx_with("M_HOT", 1, |t| {
            t.mule_score_w = 3.0;
            t.both_mismatch = true;
            t.is_dest_high_velocity = true;
            t.dest_tx_count_step = 4;
        }),
        tx_with("M_HOT", 1, |t| {
            t.mule_score_w = 2.5;
            t.is_pass_through = true;
            t.is_many_senders = true;
        }),
        // Single-shot fraud into a fresh account
        tx_with("M_ONCE", 1, |t| {
            t.both_mismatch = true;
            t.is_pass_through = true;
        }),
        // Quiet fraud the score misses
        tx("M_QUIET", 75.0, 1),
        // Clean traffic
        tx("SHOP_A", 20.0, 0),
        tx("SHOP_A", 35.0, 0),
        tx("SHOP_A", 15.0, 0),
        tx("SHOP_B", 120.0, 0),
        tx_with("SHOP_B", 0, |t| t.origin_mismatch = true),
        tx("SHOP_C", 9.0, 0),
    ])
}

pub fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fraud_signal_integration_{}_{}",
        std::process::id(),
        name
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
