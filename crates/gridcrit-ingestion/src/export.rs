//! Flat tabular export of a dataset (typically the ranked result).
//! The target file is always replaced, never appended to.

use anyhow::{Context, Result};
use gridcrit_common::Dataset;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn write_dataset<W: Write>(writer: W, dataset: &Dataset) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.columns().iter().map(|c| c.name.as_str()))?;
    for record in dataset.records() {
        let row: Vec<String> = dataset.columns().iter().map(|c| record.text(&c.name)).collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `dataset` to `path`, creating parent directories as needed.
pub fn export_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_dataset(file, dataset)?;
    info!(path = %path.display(), n_rows = dataset.n_rows(), "Dataset exported");
    Ok(())
}
