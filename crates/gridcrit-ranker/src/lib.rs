//! gridcrit-ranker: Criticality scoring engine.
//! Validates weights against a dataset, min-max normalises the weighted
//! variables, computes the weighted index and ranks records by it.

pub mod weights;
pub mod schema;
pub mod normalise;
pub mod scorer;
pub mod rank;
pub mod reference;
pub mod pipeline;

pub use pipeline::{preflight, run_criticality, CriticalityRun, PipelineOptions};
pub use rank::RankedResult;
pub use scorer::CombinedImpact;
pub use weights::{WeightEntry, WeightTable};
