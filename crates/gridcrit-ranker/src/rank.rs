//! Ranking by criticality index.

use gridcrit_common::{Dataset, Result};
use serde::Serialize;

/// Dataset ordered by index, highest first.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub dataset: Dataset,
    pub index_column: String,
    /// `original_rows[i]` is the input position of ranked row `i`
    pub original_rows: Vec<usize>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.dataset.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.n_rows() == 0
    }

    pub fn scores(&self) -> Result<&[f64]> {
        self.dataset.numeric(&self.index_column)
    }
}

/// Row order for a descending sort of `scores`. Equal scores keep their
/// input order.
pub fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// Reorder the whole dataset by `index_column`, descending. Values are not touched.
pub fn rank_by_index(dataset: &Dataset, index_column: &str) -> Result<RankedResult> {
    let scores = dataset.numeric(index_column)?;
    let order = descending_order(scores);
    Ok(RankedResult {
        dataset: dataset.reorder(&order)?,
        index_column: index_column.to_string(),
        original_rows: order,
    })
}
