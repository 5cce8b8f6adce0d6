//! Comparison of the computed index against a known reference criticality.

use gridcrit_common::{numeric, Dataset, Result};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceComparison {
    pub reference_column: String,
    pub n_records: usize,
    /// `None` when either side is constant
    pub pearson: Option<f64>,
    pub mean_abs_diff: f64,
}

/// Compare `index_column` with `reference_column`. Returns `Ok(None)` when the
/// dataset carries no reference column or when that column is not fully numeric.
pub fn compare_with_reference(
    dataset: &Dataset,
    index_column: &str,
    reference_column: &str,
) -> Result<Option<ReferenceComparison>> {
    let Some(column) = dataset.column(reference_column) else {
        return Ok(None);
    };
    let Some(reference) = column.as_numeric() else {
        warn!(column = reference_column, "Reference column is not numeric, comparison skipped");
        return Ok(None);
    };
    let computed = dataset.numeric(index_column)?;

    let mean_abs_diff = numeric::mean(
        &computed.iter().zip(reference).map(|(c, r)| (c - r).abs()).collect::<Vec<_>>(),
    )
    .unwrap_or(0.0);

    Ok(Some(ReferenceComparison {
        reference_column: reference_column.to_string(),
        n_records: computed.len(),
        pearson: numeric::pearson(computed, reference),
        mean_abs_diff,
    }))
}
