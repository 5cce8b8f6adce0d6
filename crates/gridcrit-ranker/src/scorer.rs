//! Composite criticality index.
//!
//! index = Σ(w_i × n_i) over exactly the variables of the weight table,
//! where n_i is the min-max normalised value of variable i.

use gridcrit_common::{Column, CriticalityError, Dataset, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::normalise::norm_column_name;
use crate::weights::WeightTable;

/// A variable derived as the sum of two raw columns before normalisation.
///
/// The input dataset must not already contain `output`; re-scoring an exported
/// result fails with `DerivedColumnExists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedImpact {
    pub output: String,
    pub left: String,
    pub right: String,
}

impl Default for CombinedImpact {
    /// DEC + FEC continuity impact.
    fn default() -> Self {
        Self {
            output: "Impacto_DEC_FEC".to_string(),
            left: "Impacto_DEC".to_string(),
            right: "Impacto_FEC".to_string(),
        }
    }
}

/// Append `combined.output = left + right` computed on raw values.
///
/// Fails with `MissingDerivedInput` naming every absent constituent;
/// never defaults a missing side to zero.
pub fn derive_combined_impact(dataset: &Dataset, combined: &CombinedImpact) -> Result<Dataset> {
    check_combined_inputs(&dataset.column_names(), combined)?;

    let left = dataset.numeric(&combined.left)?;
    let right = dataset.numeric(&combined.right)?;
    let sum: Vec<f64> = left.iter().zip(right).map(|(a, b)| a + b).collect();

    debug!(derived = %combined.output, "Derived combined impact");
    dataset.with_column(Column::numeric(combined.output.clone(), sum))
}

/// Check that `combined` can be derived from a dataset with these columns:
/// both constituents present and the output column not yet taken.
pub fn check_combined_inputs<S: AsRef<str>>(columns: &[S], combined: &CombinedImpact) -> Result<()> {
    let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);
    let missing: Vec<String> = [&combined.left, &combined.right]
        .into_iter()
        .filter(|c| !has(c))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(CriticalityError::MissingDerivedInput {
            derived: combined.output.clone(),
            missing,
        });
    }
    if has(&combined.output) {
        return Err(CriticalityError::DerivedColumnExists(combined.output.clone()));
    }
    Ok(())
}

/// Weighted sum of already-normalised components for one record.
pub fn weighted_sum(components: &[(f64, f64)]) -> f64 {
    components.iter().map(|(weight, norm)| weight * norm).sum()
}

/// Append the criticality index column computed from the `<variable><suffix>`
/// columns produced by the normaliser.
pub fn compute_index(
    normalized: &Dataset,
    weights: &WeightTable,
    suffix: &str,
    index_column: &str,
) -> Result<Dataset> {
    let mut columns: Vec<(f64, &[f64])> = Vec::with_capacity(weights.len());
    for entry in weights.entries() {
        let values = normalized.numeric(&norm_column_name(&entry.variable, suffix))?;
        columns.push((entry.weight, values));
    }

    let mut index = Vec::with_capacity(normalized.n_rows());
    let mut components = Vec::with_capacity(columns.len());
    for row in 0..normalized.n_rows() {
        components.clear();
        components.extend(columns.iter().map(|(w, values)| (*w, values[row])));
        let score = weighted_sum(&components);
        if !score.is_finite() {
            return Err(CriticalityError::NonFiniteValue { column: index_column.to_string(), row });
        }
        index.push(score);
    }

    info!(
        n_records = index.len(),
        n_variables = weights.len(),
        total_weight = weights.total(),
        "Criticality index computed"
    );
    normalized.with_column(Column::numeric(index_column, index))
}
