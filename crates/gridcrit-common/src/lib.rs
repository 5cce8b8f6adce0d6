//! gridcrit-common: Shared types, errors, and configuration used across all gridcrit crates.

pub mod error;
pub mod entities;
pub mod numeric;
pub mod run_config;

// Re-export commonly used types
pub use entities::{Cell, Column, ColumnData, Dataset, Record};
pub use error::{CriticalityError, Result};
pub use run_config::{GeneratorConfig, OutputConfig, PathsConfig, RunConfig, ScoringConfig};
