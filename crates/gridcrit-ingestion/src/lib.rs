//! gridcrit-ingestion: Tabular input and output around the scoring engine:
//! - Interruption-record CSV loading with column type inference
//! - Weight file loading, saving and first-run defaults
//! - Ranked result export
//! - Synthetic dataset generation
//! - Exploratory dataset profiling

pub mod sources;
pub mod weights_file;
pub mod export;
pub mod generator;
pub mod profile;
