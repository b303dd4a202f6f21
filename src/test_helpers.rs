use crate::models::{Transaction, TransactionTable, TxType};

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

/// A row with specific indicators switched on by the caller.
pub fn tx_with(name_dest: &str, is_fraud: u8, build: impl FnOnce(&mut Transaction)) -> Transaction {
    let mut t = tx(name_dest, 100.0, is_fraud);
    build(&mut t);
    t
}

pub fn make_table(rows: &[Transaction]) -> TransactionTable {
    TransactionTable::new(rows.to_vec())
}
