use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::{Transaction, TransactionTable};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path} contains no data rows")]
    Empty { path: String },
}

/// Load the feature table from a headered CSV file.
///
/// Numeric coercion happens field by field inside the `Transaction`
/// deserializers; a structurally broken file (bad quoting, unreadable row)
/// is still a hard error.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<TransactionTable, DataError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let file = File::open(path).map_err(|source| DataError::Open {
        path: path_str.clone(),
        source,
    })?;

    let mut rdr = csv::Reader::from_reader(file);
    let mut rows: Vec<Transaction> = Vec::new();
    for record in rdr.deserialize() {
        let mut tx: Transaction = record.map_err(|source| DataError::Csv {
            path: path_str.clone(),
            source,
        })?;
        // Backfill log_amount when the source table predates the column.
        if tx.log_amount == 0.0 && tx.amount > 0.0 {
            tx.log_amount = (tx.amount + 1.0).ln();
        }
        rows.push(tx);
    }

    if rows.is_empty() {
        return Err(DataError::Empty { path: path_str });
    }

    info!("Loaded {} rows from {}", rows.len(), path_str);
    Ok(TransactionTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxType;
    use std::io::Write;

    fn write_temp_csv(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fraud_signal_loader_{}_{}",
            std::process::id(),
            name
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_well_formed_rows() {
        let path = write_temp_csv(
            "ok.csv",
            "step,type,amount,log_amount,nameOrig,nameDest,isFraud,origin_mismatch,dest_mismatch,either_mismatch,both_mismatch,mule_score_w,is_dest_high_velocity,is_pass_through,is_many_senders,dest_tx_count_step\n\
             1,TRANSFER,100.0,4.615,C1,M1,1,1,0,1,0,2.5,1,0,0,4\n\
             2,PAYMENT,50.0,3.932,C2,M2,0,0,0,0,0,0.0,0,0,0,1\n",
        );
        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].tx_type, TxType::Transfer);
        assert_eq!(table[0].is_fraud, 1);
        assert!(table[0].origin_mismatch);
        assert_eq!(table[1].dest_tx_count_step, 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_numerics_coerce_to_zero() {
        let path = write_temp_csv(
            "coerce.csv",
            "step,type,amount,log_amount,nameOrig,nameDest,isFraud,mule_score_w,dest_tx_count_step\n\
             1,TRANSFER,oops,,C1,M1,maybe,bad,-3\n",
        );
        let table = load_table(&path).unwrap();
        let t = &table[0];
        assert_eq!(t.amount, 0.0);
        assert_eq!(t.is_fraud, 0);
        assert_eq!(t.mule_score_w, 0.0);
        assert_eq!(t.dest_tx_count_step, 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn log_amount_backfilled_when_missing() {
        let path = write_temp_csv(
            "backfill.csv",
            "type,amount,nameDest,isFraud\nPAYMENT,99.0,M1,0\n",
        );
        let table = load_table(&path).unwrap();
        assert!((table[0].log_amount - 100.0_f64.ln()).abs() < 1e-9);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = load_table("/nonexistent/never.csv").unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
    }

    #[test]
    fn header_only_file_is_empty_error() {
        let path = write_temp_csv("empty.csv", "type,amount,nameDest,isFraud\n");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
        std::fs::remove_file(path).ok();
    }
}
