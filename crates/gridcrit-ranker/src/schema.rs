//! Schema validation: every weighted variable must be a dataset column.
//! Failure is always terminal.

use gridcrit_common::{CriticalityError, Result};
use tracing::{debug, error};

use crate::weights::WeightTable;

/// Weighted variables absent from `columns`, in weight-table order.
pub fn missing_variables<S: AsRef<str>>(columns: &[S], weights: &WeightTable) -> Vec<String> {
    weights
        .variables()
        .filter(|v| !columns.iter().any(|c| c.as_ref() == *v))
        .map(str::to_string)
        .collect()
}

/// Check `weights` against the dataset's column names.
///
/// `derived` lists columns the pipeline will add before normalisation
/// (e.g. the combined impact); they count as available.
pub fn validate_schema<S: AsRef<str>>(
    columns: &[S],
    derived: &[&str],
    weights: &WeightTable,
) -> Result<()> {
    if columns.is_empty() {
        return Err(CriticalityError::EmptyDataset);
    }
    if weights.is_empty() {
        return Err(CriticalityError::EmptyWeightTable);
    }

    let missing: Vec<String> = missing_variables(columns, weights)
        .into_iter()
        .filter(|v| !derived.contains(&v.as_str()))
        .collect();

    if !missing.is_empty() {
        error!(missing = ?missing, "Weighted variables not found in dataset");
        return Err(CriticalityError::SchemaMismatch { missing });
    }

    debug!(n_variables = weights.len(), "Schema validated");
    Ok(())
}
