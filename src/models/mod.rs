pub mod transaction;
pub mod tx_type;

pub use transaction::{Transaction, TransactionTable};
pub use tx_type::TxType;
