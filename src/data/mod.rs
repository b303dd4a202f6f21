pub mod loader;
pub mod writer;

pub use loader::{load_table, DataError};
pub use writer::{write_csv_rows, write_run_summary, write_scored_table, RunSummary};
