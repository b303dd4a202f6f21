use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use super::tx_type::TxType;

fn parse_lenient(raw: &str) -> f64 {
    let s = raw.trim();
    match s.to_ascii_lowercase().as_str() {
        "" => 0.0,
        "true" => 1.0,
        "false" => 0.0,
        _ => s.parse::<f64>().unwrap_or(0.0),
    }
}

/// Malformed or missing numeric input coerces to 0 rather than failing the row.
fn num_or_zero<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().map(parse_lenient).unwrap_or(0.0))
}

fn count_or_zero<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    let v = raw.as_deref().map(parse_lenient).unwrap_or(0.0);
    Ok(if v > 0.0 { v as u32 } else { 0 })
}

fn label_or_zero<'de, D>(d: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    let v = raw.as_deref().map(parse_lenient).unwrap_or(0.0);
    Ok(u8::from(v != 0.0))
}

fn flag_or_false<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().map(parse_lenient).unwrap_or(0.0) != 0.0)
}

/// Flags are written back as 0/1 so the output table matches the input format.
fn flag_as_int<S>(v: &bool, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_u8(u8::from(*v))
}

/// One row of the feature table.
///
/// Field names map onto the source CSV headers; indicator columns are
/// precomputed upstream and only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub step: u32,
    #[serde(rename = "type", default)]
    pub tx_type: TxType,
    #[serde(default, deserialize_with = "num_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "num_or_zero")]
    pub log_amount: f64,
    #[serde(rename = "nameOrig", default)]
    pub name_orig: String,
    #[serde(rename = "nameDest", default)]
    pub name_dest: String,
    #[serde(rename = "isFraud", default, deserialize_with = "label_or_zero")]
    pub is_fraud: u8,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub origin_mismatch: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub dest_mismatch: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub either_mismatch: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub both_mismatch: bool,
    #[serde(default, deserialize_with = "num_or_zero")]
    pub mule_score_w: f64,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub is_dest_high_velocity: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub is_pass_through: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_false",
        serialize_with = "flag_as_int"
    )]
    pub is_many_senders: bool,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub dest_tx_count_step: u32,
}

/// Wraps `Vec<Transaction>` with helper methods replacing DataFrame operations.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
}

impl TransactionTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn push(&mut self, tx: Transaction) {
        self.rows.push(tx);
    }

    pub fn labels(&self) -> Vec<u8> {
        self.rows.iter().map(|t| t.is_fraud).collect()
    }

    pub fn log_amounts(&self) -> Vec<f64> {
        self.rows.iter().map(|t| t.log_amount).collect()
    }

    pub fn mule_scores(&self) -> Vec<f64> {
        self.rows.iter().map(|t| t.mule_score_w).collect()
    }

    pub fn fraud_count(&self) -> usize {
        self.rows.iter().filter(|t| t.is_fraud == 1).count()
    }

    /// Mean of the ground-truth label over the whole table.
    pub fn baseline_fraud_rate(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.fraud_count() as f64 / self.rows.len() as f64
    }

    /// Total number of rows received by each destination account, computed
    /// once across the full table.
    pub fn dest_lifetime_counts(&self) -> HashMap<String, u32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for t in &self.rows {
            *counts.entry(t.name_dest.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Split a projected column into (non-fraud, fraud) value vectors.
    pub fn split_by_fraud<F>(&self, f: F) -> (Vec<f64>, Vec<f64>)
    where
        F: Fn(&Transaction) -> f64,
    {
        let mut non_fraud = Vec::new();
        let mut fraud = Vec::new();
        for t in &self.rows {
            if t.is_fraud == 1 {
                fraud.push(f(t));
            } else {
                non_fraud.push(f(t));
            }
        }
        (non_fraud, fraud)
    }

    /// Row counts per transaction type, most frequent first.
    pub fn type_counts(&self) -> Vec<(TxType, usize)> {
        let mut counts: HashMap<TxType, usize> = HashMap::new();
        for t in &self.rows {
            *counts.entry(t.tx_type.clone()).or_insert(0) += 1;
        }
        let mut out: Vec<(TxType, usize)> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        out
    }
}

impl std::ops::Index<usize> for TransactionTable {
    type Output = Transaction;
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl IntoIterator for TransactionTable {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_table, tx};

    #[test]
    fn lenient_parse_coerces_garbage_to_zero() {
        assert_eq!(parse_lenient("2.5"), 2.5);
        assert_eq!(parse_lenient(" 3 "), 3.0);
        assert_eq!(parse_lenient("True"), 1.0);
        assert_eq!(parse_lenient("false"), 0.0);
        assert_eq!(parse_lenient(""), 0.0);
        assert_eq!(parse_lenient("not-a-number"), 0.0);
    }

    #[test]
    fn baseline_fraud_rate() {
        let table = make_table(&[
            tx("D1", 100.0, 0),
            tx("D2", 100.0, 1),
            tx("D3", 100.0, 1),
            tx("D4", 100.0, 0),
        ]);
        assert!((table.baseline_fraud_rate() - 0.5).abs() < 1e-9);
        assert_eq!(table.fraud_count(), 2);
    }

    #[test]
    fn baseline_of_empty_table_is_zero() {
        let table = TransactionTable::default();
        assert_eq!(table.baseline_fraud_rate(), 0.0);
    }

    #[test]
    fn dest_lifetime_counts_group_by_account() {
        let table = make_table(&[
            tx("A", 10.0, 0),
            tx("A", 20.0, 0),
            tx("B", 30.0, 1),
        ]);
        let counts = table.dest_lifetime_counts();
        assert_eq!(counts["A"], 2);
        assert_eq!(counts["B"], 1);
    }

    #[test]
    fn split_by_fraud_partitions_rows() {
        let table = make_table(&[
            tx("A", 10.0, 0),
            tx("B", 20.0, 1),
            tx("C", 30.0, 0),
        ]);
        let (non_fraud, fraud) = table.split_by_fraud(|t| t.amount);
        assert_eq!(non_fraud, vec![10.0, 30.0]);
        assert_eq!(fraud, vec![20.0]);
    }
}
