//! Delimited interruption-record tables.
//!
//! Loads a CSV file with a header row into a [`Dataset`]. Column types are
//! inferred: a column is numeric when every cell parses as a number,
//! otherwise it is kept as text (dates and categories stay text).

use anyhow::{Context, Result};
use gridcrit_common::{Column, Dataset};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load a dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        anyhow::bail!(
            "Dataset not found at {:?}\n\
             Generate one with `gridcrit generate` or point --dataset at an existing file.",
            path
        );
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;
    let dataset = read_dataset(file)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

    info!(
        path = %path.display(),
        n_rows = dataset.n_rows(),
        n_columns = dataset.n_columns(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parse a dataset from any CSV reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if header.is_empty() || header.iter().all(|h| h.is_empty()) {
        anyhow::bail!("CSV has no header row");
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); header.len()];
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Malformed row {}", i + 1))?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns = header
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Ok(Dataset::new(columns)?)
}

fn infer_column(name: String, raw: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = raw.iter().map(|s| parse_number(s)).collect();
    match parsed {
        Some(values) if !values.is_empty() => {
            debug!(column = %name, "Numeric column");
            Column::numeric(name, values)
        }
        _ => Column::text(name, raw),
    }
}

/// Finite decimal numbers only: "nan"/"inf" stay text.
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
