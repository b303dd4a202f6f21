use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction type category from the `type` column.
///
/// Unknown labels are carried through as `Other` so a load/rewrite cycle
/// never drops information from the source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxType {
    CashIn,
    CashOut,
    Transfer,
    Payment,
    Debit,
    Other(String),
}

impl TxType {
    pub fn as_str(&self) -> &str {
        match self {
            TxType::CashIn => "CASH_IN",
            TxType::CashOut => "CASH_OUT",
            TxType::Transfer => "TRANSFER",
            TxType::Payment => "PAYMENT",
            TxType::Debit => "DEBIT",
            TxType::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for TxType {
    fn default() -> Self {
        TxType::Other(String::new())
    }
}

impl From<String> for TxType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH_IN" => TxType::CashIn,
            "CASH_OUT" => TxType::CashOut,
            "TRANSFER" => TxType::Transfer,
            "PAYMENT" => TxType::Payment,
            "DEBIT" => TxType::Debit,
            _ => TxType::Other(s),
        }
    }
}

impl From<TxType> for String {
    fn from(t: TxType) -> Self {
        t.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_round_trip() {
        for label in ["CASH_IN", "CASH_OUT", "TRANSFER", "PAYMENT", "DEBIT"] {
            let t = TxType::from(label.to_string());
            assert_eq!(t.as_str(), label);
        }
    }

    #[test]
    fn case_insensitive_parse() {
        assert_eq!(TxType::from("transfer".to_string()), TxType::Transfer);
        assert_eq!(TxType::from(" cash_out ".to_string()), TxType::CashOut);
    }

    #[test]
    fn unknown_label_preserved() {
        let t = TxType::from("WIRE".to_string());
        assert_eq!(t, TxType::Other("WIRE".to_string()));
        assert_eq!(String::from(t), "WIRE");
    }
}
