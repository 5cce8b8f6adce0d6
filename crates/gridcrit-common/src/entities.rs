/// Core tabular types shared by the loader, the scoring engine and the reports.
/// A dataset is column-oriented: every column holds one value per record.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CriticalityError, Result};

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, order: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(order.iter().map(|&i| v[i]).collect()),
            ColumnData::Text(v) => ColumnData::Text(order.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), data: ColumnData::Numeric(values) }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self { name: name.into(), data: ColumnData::Text(values) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Cell rendered as it would appear in a delimited file.
    pub fn cell(&self, row: usize) -> Option<Cell<'_>> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map(|&x| Cell::Number(x)),
            ColumnData::Text(v) => v.get(row).map(|s| Cell::Text(s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(x) => write!(f, "{x}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An ordered set of equal-length, uniquely named columns.
///
/// Stages never mutate a dataset; [`Dataset::with_column`] and
/// [`Dataset::reorder`] return a new table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CriticalityError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != n_rows {
                return Err(CriticalityError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric values of a column, or an error naming why they are unavailable.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        let column = self
            .column(name)
            .ok_or_else(|| CriticalityError::UnknownColumn(name.to_string()))?;
        column
            .as_numeric()
            .ok_or_else(|| CriticalityError::NonNumericColumn { column: name.to_string() })
    }

    /// Return a copy of this dataset with `column` appended.
    pub fn with_column(&self, column: Column) -> Result<Dataset> {
        if self.has_column(&column.name) {
            return Err(CriticalityError::DuplicateColumn(column.name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(CriticalityError::LengthMismatch {
                expected: self.n_rows,
                found: column.len(),
                column: column.name,
            });
        }
        let mut columns = self.columns.clone();
        let n_rows = column.len();
        columns.push(column);
        Ok(Dataset { columns, n_rows })
    }

    /// Return a copy with rows in the given order. `order` must be a
    /// permutation of `0..n_rows`.
    pub fn reorder(&self, order: &[usize]) -> Result<Dataset> {
        let mut seen = vec![false; self.n_rows];
        if order.len() != self.n_rows {
            return Err(CriticalityError::LengthMismatch {
                column: "<row order>".to_string(),
                expected: self.n_rows,
                found: order.len(),
            });
        }
        for &i in order {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(CriticalityError::Other(anyhow::anyhow!(
                        "row order is not a permutation (index {i})"
                    )))
                }
            }
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column { name: c.name.clone(), data: c.data.select(order) })
            .collect();
        Ok(Dataset { columns, n_rows: self.n_rows })
    }

    pub fn record(&self, row: usize) -> Option<Record<'_>> {
        (row < self.n_rows).then_some(Record { dataset: self, row })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        (0..self.n_rows).map(move |row| Record { dataset: self, row })
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Borrowed view of one row of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    dataset: &'a Dataset,
    row: usize,
}

impl<'a> Record<'a> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn get(&self, column: &str) -> Option<Cell<'a>> {
        self.dataset.column(column)?.cell(self.row)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Cell::Number(x) => Some(x),
            Cell::Text(_) => None,
        }
    }

    /// Cell rendered as text; empty when the column is absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(|c| c.to_string()).unwrap_or_default()
    }
}
