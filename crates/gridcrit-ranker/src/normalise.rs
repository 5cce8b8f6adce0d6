//! Min-max normalisation of weighted variables.
//!
//! `norm(v) = (v - min) / (max - min)` over the whole dataset. A constant
//! column (`max == min`) normalises to 0 for every record.

use gridcrit_common::{numeric, Column, CriticalityError, Dataset, Result};
use tracing::{debug, warn};

use crate::weights::WeightTable;

/// Min-max normalisation of one value within `[min_val, max_val]`.
/// Returns 0.0 for a degenerate range.
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    if max_val == min_val {
        return 0.0;
    }
    let range = max_val - min_val;
    let norm = if range.is_finite() {
        (value - min_val) / range
    } else {
        // halve everything so the subtraction cannot overflow
        (value / 2.0 - min_val / 2.0) / (max_val / 2.0 - min_val / 2.0)
    };
    norm.clamp(0.0, 1.0)
}

/// Normalised values of one column plus the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl NormalizedColumn {
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Normalise a full column. Every input must be finite; `column` is only
/// used to name the offending variable in the error.
pub fn normalise_column(column: &str, values: &[f64]) -> Result<NormalizedColumn> {
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(CriticalityError::NonFiniteValue { column: column.to_string(), row });
    }
    let (min, max) = numeric::min_max(values).ok_or(CriticalityError::EmptyDataset)?;
    let values = values.iter().map(|&v| minmax_normalise(v, min, max)).collect();
    Ok(NormalizedColumn { values, min, max })
}

/// Output of [`normalise_dataset`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Input dataset with one `<variable><suffix>` column per weighted variable
    pub dataset: Dataset,
    /// Weighted variables whose column was constant
    pub degenerate: Vec<String>,
}

pub fn norm_column_name(variable: &str, suffix: &str) -> String {
    format!("{variable}{suffix}")
}

/// Append a normalised column for every variable in `weights`.
/// Raw columns are left as they are.
pub fn normalise_dataset(dataset: &Dataset, weights: &WeightTable, suffix: &str) -> Result<Normalized> {
    if dataset.n_rows() == 0 {
        return Err(CriticalityError::EmptyDataset);
    }

    let mut out = dataset.clone();
    let mut degenerate = Vec::new();

    for variable in weights.variables() {
        let raw = dataset.numeric(variable)?;
        let normed = normalise_column(variable, raw)?;

        if normed.is_degenerate() {
            warn!(
                variable,
                value = normed.min,
                "Constant column: normalised to 0, variable adds no signal in this run"
            );
            degenerate.push(variable.to_string());
        } else {
            debug!(variable, min = normed.min, max = normed.max, "Normalised");
        }

        out = out.with_column(Column::numeric(norm_column_name(variable, suffix), normed.values))?;
    }

    Ok(Normalized { dataset: out, degenerate })
}
