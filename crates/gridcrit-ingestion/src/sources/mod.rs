//! Dataset sources.

pub mod table_csv;

pub use table_csv::{load_dataset, read_dataset};
